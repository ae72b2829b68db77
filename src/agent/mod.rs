//! # Learning Agent
//!
//! [`DqnAgent`] combines a [`ReplayBuffer`](crate::replay_buffer::ReplayBuffer),
//! an [`EpsilonGreedy`](crate::exploration::EpsilonGreedy) policy and two
//! [`ValueApproximator`](crate::approximator::ValueApproximator)s.
//!
//! A training run moves through these phases, repeatedly:
//!
//! 1. **Accumulating**: transitions are observed but `train_step` is a no-op
//!    until the buffer holds `batch_size` of them.
//! 2. **Training**: every `train_step` samples a batch and fits the online
//!    approximator once per sampled transition, bootstrapping from the target.
//! 3. **Synced**: at the cadence chosen by the caller (by default every
//!    terminal step), `sync_target` copies the online parameters to the target.
//!
//! Exploration decays only when `decay_exploration` is called, normally once
//! per episode.

mod config;
mod dqn;

pub use config::DqnConfig;
pub use dqn::DqnAgent;
