//! # deepq - Deep Q-Learning for discrete-action control
//!
//! deepq trains a control policy for environments with a fixed-size continuous
//! observation vector and a small discrete action set, using Deep Q-Learning
//! with experience replay, epsilon-greedy exploration and a target network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepq::agent::{DqnAgent, DqnConfig};
//! use deepq::driver::EpisodeDriver;
//! # use deepq::env::{Environment, Step};
//! # use ndarray::Array1;
//! # struct MyEnv;
//! # impl Environment for MyEnv {
//! #     fn state_size(&self) -> usize { 8 }
//! #     fn action_count(&self) -> usize { 4 }
//! #     fn reset(&mut self) -> deepq::Result<Array1<f32>> { Ok(Array1::zeros(8)) }
//! #     fn step(&mut self, _a: usize) -> deepq::Result<Step> {
//! #         Ok(Step { next_state: Array1::zeros(8), reward: 0.0, done: true })
//! #     }
//! # }
//!
//! let mut env = MyEnv;
//! let config = DqnConfig::new(env.state_size(), env.action_count()).seed(42);
//! let mut agent = DqnAgent::new(&config).unwrap();
//!
//! let summaries = EpisodeDriver::new(500, 1000).run(&mut agent, &mut env).unwrap();
//! println!("last reward: {}", summaries.last().unwrap().total_reward);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions for dense layers
//! - [`agent`] - The DQN learning agent and its configuration
//! - [`approximator`] - The value approximator interface and parameter snapshots
//! - [`driver`] - Episode loop connecting an environment and an agent
//! - [`env`] - Environment contract
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Epsilon-greedy exploration
//! - [`layers`] - Dense layers and weight initialization
//! - [`network`] - Feed-forward Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay

pub mod activations;
pub mod agent;
pub mod approximator;
pub mod driver;
pub mod env;
pub mod error;
pub mod exploration;
pub mod layers;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;

pub use error::{DqnError, Result};

#[cfg(test)]
mod tests;
