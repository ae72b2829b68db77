use log::{debug, info};
use ndarray::{Array1, ArrayView1};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;

use crate::approximator::{argmax, max_value, Parameters, ValueApproximator};
use crate::error::{DqnError, Result};
use crate::exploration::EpsilonGreedy;
use crate::network::NeuralNetwork;
use crate::replay_buffer::{ReplayBuffer, Transition};
use super::config::DqnConfig;

/// Deep Q-Network agent with experience replay and a target network.
///
/// The agent owns everything that changes during training: the replay buffer,
/// the exploration policy, the online and target approximators and the random
/// source. Independent runs therefore share no state.
///
/// # Example
///
/// ```rust
/// use deepq::agent::{DqnAgent, DqnConfig};
/// use ndarray::array;
///
/// let config = DqnConfig::new(4, 2).batch_size(2).seed(7);
/// let mut agent = DqnAgent::new(&config).unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.select_action(state.view()).unwrap();
///
/// // After an environment step...
/// let next_state = array![0.15, -0.25, 0.35, -0.05];
/// agent.observe_transition(state.view(), action, 1.0, next_state.view(), false).unwrap();
///
/// // Not enough data yet: the step is skipped.
/// assert_eq!(agent.train_step().unwrap(), None);
///
/// agent.observe_transition(next_state.view(), 0, 0.0, state.view(), true).unwrap();
/// assert!(agent.train_step().unwrap().is_some());
///
/// agent.sync_target().unwrap();
/// agent.decay_exploration();
/// ```
pub struct DqnAgent<Q = NeuralNetwork> {
    online: Q,
    target: Q,
    buffer: ReplayBuffer,
    policy: EpsilonGreedy,
    gamma: f32,
    batch_size: usize,
    train_steps: usize,
    rng: StdRng,
}

impl DqnAgent<NeuralNetwork> {
    /// Builds an agent with two identical Q-networks shaped by `config`.
    pub fn new(config: &DqnConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let online = NeuralNetwork::q_network(
            config.state_size,
            &config.hidden_layers,
            config.action_count,
            config.optimizer,
            config.learning_rate,
            &mut rng,
        )?;
        let target = online.clone();

        Self::assemble(online, target, config, rng)
    }
}

impl<Q: ValueApproximator> DqnAgent<Q> {
    /// Builds an agent around caller-supplied approximators.
    ///
    /// Both must match `config.state_size` and `config.action_count`. The
    /// target is synchronized from the online approximator before returning.
    pub fn with_approximators(online: Q, target: Q, config: &DqnConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut agent = Self::assemble(online, target, config, rng)?;
        agent.target.set_parameters(&agent.online.parameters())?;
        Ok(agent)
    }

    fn assemble(online: Q, target: Q, config: &DqnConfig, rng: StdRng) -> Result<Self> {
        for (name, approximator) in [("online", &online), ("target", &target)] {
            if approximator.state_size() != config.state_size || approximator.action_count() != config.action_count {
                return Err(DqnError::dimension_mismatch(
                    format!("{} approximator {} -> {}", name, config.state_size, config.action_count),
                    format!("{} -> {}", approximator.state_size(), approximator.action_count()),
                ));
            }
        }

        let policy = EpsilonGreedy::new(config.epsilon, config.epsilon_min, config.epsilon_decay)?;
        let buffer = ReplayBuffer::try_new(config.buffer_capacity)?;

        Ok(DqnAgent {
            online,
            target,
            buffer,
            policy,
            gamma: config.gamma,
            batch_size: config.batch_size,
            train_steps: 0,
            rng,
        })
    }

    /// Epsilon-greedy action for `state`. Epsilon is left unchanged.
    pub fn select_action(&mut self, state: ArrayView1<f32>) -> Result<usize> {
        let greedy = self.greedy_action(state)?;
        Ok(self.policy.select(self.online.action_count(), greedy, &mut self.rng))
    }

    /// Best action according to the online approximator, lowest index on ties.
    pub fn greedy_action(&self, state: ArrayView1<f32>) -> Result<usize> {
        let q_values = self.online.predict(state)?;
        argmax(q_values.view()).ok_or_else(|| DqnError::Numerical("No comparable Q-values".to_string()))
    }

    /// Record one transition in the replay buffer.
    ///
    /// Rejects wrongly shaped states, out-of-range actions and non-finite
    /// rewards or observations before anything is stored.
    pub fn observe_transition(
        &mut self,
        state: ArrayView1<f32>,
        action: usize,
        reward: f32,
        next_state: ArrayView1<f32>,
        done: bool,
    ) -> Result<()> {
        self.online.check_state(state)?;
        self.online.check_state(next_state)?;
        let max_actions = self.online.action_count();
        if action >= max_actions {
            return Err(DqnError::InvalidAction { action, max_actions });
        }
        if !reward.is_finite() {
            return Err(DqnError::Numerical(format!("Non-finite reward {}", reward)));
        }
        if !state.iter().chain(next_state.iter()).all(|v| v.is_finite()) {
            return Err(DqnError::Numerical("Non-finite value in observed state".to_string()));
        }

        self.buffer.add(Transition {
            state: state.to_owned(),
            action,
            reward,
            next_state: next_state.to_owned(),
            done,
        });
        Ok(())
    }

    /// One replay update of the online approximator.
    ///
    /// Returns `Ok(None)` without touching any parameter while fewer than
    /// `batch_size` transitions are stored. Otherwise each sampled transition
    /// is fitted in turn and the mean pre-update loss is returned.
    pub fn train_step(&mut self) -> Result<Option<f32>> {
        if self.buffer.len() < self.batch_size {
            return Ok(None);
        }

        let batch = self.buffer.sample(self.batch_size, &mut self.rng)?;
        let mut total_loss = 0.0;

        for transition in batch {
            let td_target = if transition.done {
                transition.reward
            } else {
                let next_q = self.target.predict(transition.next_state.view())?;
                let max_next = max_value(next_q.view())
                    .ok_or_else(|| DqnError::Numerical("No comparable bootstrap Q-values".to_string()))?;
                transition.reward + self.gamma * max_next
            };

            let mut target_values: Array1<f32> = self.online.predict(transition.state.view())?;
            target_values[transition.action] = td_target;

            total_loss += self.online.fit(transition.state.view(), target_values.view())?;
        }

        self.train_steps += 1;
        let mean_loss = total_loss / self.batch_size as f32;
        debug!("train step {}: mean loss {:.6}", self.train_steps, mean_loss);
        Ok(Some(mean_loss))
    }

    /// Copy the online parameters into the target approximator.
    pub fn sync_target(&mut self) -> Result<()> {
        self.target.set_parameters(&self.online.parameters())?;
        debug!("target synchronized after {} train steps", self.train_steps);
        Ok(())
    }

    pub fn decay_exploration(&mut self) {
        self.policy.decay();
    }

    pub fn epsilon(&self) -> f32 {
        self.policy.epsilon()
    }

    pub fn policy(&self) -> &EpsilonGreedy {
        &self.policy
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn online(&self) -> &Q {
        &self.online
    }

    pub fn target(&self) -> &Q {
        &self.target
    }

    pub fn state_size(&self) -> usize {
        self.online.state_size()
    }

    pub fn action_count(&self) -> usize {
        self.online.action_count()
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of `train_step` calls that updated the online approximator.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Write the online parameters to a bincode checkpoint.
    pub fn save_parameters<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.online.parameters().save(path)?;
        info!("Saved parameters to {}", path.display());
        Ok(())
    }

    /// Restore online and target parameters from a checkpoint.
    pub fn load_parameters<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let parameters = Parameters::load(path)?;
        self.online.set_parameters(&parameters)?;
        self.target.set_parameters(&parameters)?;
        info!("Loaded parameters from {}", path.display());
        Ok(())
    }
}
