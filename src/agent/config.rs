//! Configuration of [`DqnAgent`](super::DqnAgent).
use serde::{Deserialize, Serialize};
use std::{fs::File, io::{BufReader, Write}, path::Path};

use crate::error::{DqnError, Result};
use crate::optimizer::OptimizerConfig;

fn default_hidden_layers() -> Vec<usize> {
    vec![64, 64]
}

fn default_learning_rate() -> f32 {
    1e-4
}

fn default_gamma() -> f32 {
    0.99
}

fn default_batch_size() -> usize {
    32
}

fn default_buffer_capacity() -> usize {
    4000
}

fn default_epsilon() -> f32 {
    1.0
}

fn default_epsilon_min() -> f32 {
    0.01
}

fn default_epsilon_decay() -> f32 {
    0.9993
}

/// Hyperparameters of a DQN training run.
///
/// Only `state_size` and `action_count` are required in a config file; every
/// other field falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Observation dimensionality `N`.
    pub state_size: usize,

    /// Number of discrete actions `A`.
    pub action_count: usize,

    #[serde(default = "default_hidden_layers")]
    pub hidden_layers: Vec<usize>,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,

    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Discount factor.
    #[serde(default = "default_gamma")]
    pub gamma: f32,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    #[serde(default = "default_epsilon")]
    pub epsilon: f32,

    #[serde(default = "default_epsilon_min")]
    pub epsilon_min: f32,

    #[serde(default = "default_epsilon_decay")]
    pub epsilon_decay: f32,

    /// Seed for weight initialization, exploration and replay sampling.
    /// `None` seeds from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DqnConfig {
    /// Default hyperparameters for an environment with `state_size` observations
    /// and `action_count` actions.
    pub fn new(state_size: usize, action_count: usize) -> Self {
        Self {
            state_size,
            action_count,
            hidden_layers: default_hidden_layers(),
            learning_rate: default_learning_rate(),
            optimizer: OptimizerConfig::default(),
            gamma: default_gamma(),
            batch_size: default_batch_size(),
            buffer_capacity: default_buffer_capacity(),
            epsilon: default_epsilon(),
            epsilon_min: default_epsilon_min(),
            epsilon_decay: default_epsilon_decay(),
            seed: None,
        }
    }

    pub fn hidden_layers(mut self, v: &[usize]) -> Self {
        self.hidden_layers = v.to_vec();
        self
    }

    pub fn learning_rate(mut self, v: f32) -> Self {
        self.learning_rate = v;
        self
    }

    pub fn optimizer(mut self, v: OptimizerConfig) -> Self {
        self.optimizer = v;
        self
    }

    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    pub fn buffer_capacity(mut self, v: usize) -> Self {
        self.buffer_capacity = v;
        self
    }

    /// Sets initial epsilon, its floor and the per-call decay factor.
    pub fn exploration(mut self, epsilon: f32, epsilon_min: f32, epsilon_decay: f32) -> Self {
        self.epsilon = epsilon;
        self.epsilon_min = epsilon_min;
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn seed(mut self, v: u64) -> Self {
        self.seed = Some(v);
        self
    }

    /// Checks the values that are not validated by the components themselves.
    pub fn validate(&self) -> Result<()> {
        if self.state_size == 0 {
            return Err(DqnError::invalid_parameter("state_size", "must be positive"));
        }
        if self.action_count == 0 {
            return Err(DqnError::invalid_parameter("action_count", "must be positive"));
        }
        if self.hidden_layers.iter().any(|&h| h == 0) {
            return Err(DqnError::invalid_parameter("hidden_layers", "sizes must be positive"));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(DqnError::invalid_parameter(
                "gamma".to_string(),
                format!("must lie in [0, 1), got {}", self.gamma),
            ));
        }
        if self.batch_size == 0 {
            return Err(DqnError::invalid_parameter("batch_size", "must be positive"));
        }
        if self.buffer_capacity < self.batch_size {
            return Err(DqnError::invalid_parameter(
                "buffer_capacity".to_string(),
                format!("{} cannot hold a batch of {}", self.buffer_capacity, self.batch_size),
            ));
        }
        Ok(())
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config: Self = serde_json::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}
