//! Environment contract used by [`EpisodeDriver`](crate::driver::EpisodeDriver).

use ndarray::Array1;

use crate::error::Result;

/// Outcome of one environment step.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// A continuous-observation, discrete-action environment.
///
/// `state_size` and `action_count` must stay fixed for the lifetime of a run.
pub trait Environment {
    /// Observation dimensionality `N`.
    fn state_size(&self) -> usize;

    /// Number of discrete actions `A`.
    fn action_count(&self) -> usize;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Applies `action` in `[0, action_count)`.
    fn step(&mut self, action: usize) -> Result<Step>;
}
