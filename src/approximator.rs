//! # Value Approximators
//!
//! A value approximator maps an observation vector of length `N` to one
//! estimated action-value per discrete action (`A` outputs). The agent keeps two
//! instances: the *online* approximator, trained by [`ValueApproximator::fit`],
//! and the *target* approximator, which only changes through
//! [`ValueApproximator::set_parameters`].

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::error::{DqnError, Result};

/// Weights and biases of a single dense layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerParameters {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

/// A full snapshot of every learnable parameter of an approximator, in layer order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub layers: Vec<LayerParameters>,
}

impl Parameters {
    /// Total number of scalar parameters.
    pub fn len(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Save the snapshot to a bincode file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a snapshot previously written by [`Parameters::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }
}

/// A differentiable mapping from state to action-values.
pub trait ValueApproximator {
    /// Observation dimensionality `N`.
    fn state_size(&self) -> usize;

    /// Number of discrete actions `A`.
    fn action_count(&self) -> usize;

    /// Evaluate the action-values of `state`. Must not change the approximator.
    fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>>;

    /// One supervised gradient step reducing the mean-squared error between
    /// `predict(state)` and `target`. Returns the loss before the update.
    fn fit(&mut self, state: ArrayView1<f32>, target: ArrayView1<f32>) -> Result<f32>;

    /// Snapshot of every learnable parameter.
    fn parameters(&self) -> Parameters;

    /// Restore a snapshot taken with [`ValueApproximator::parameters`].
    fn set_parameters(&mut self, parameters: &Parameters) -> Result<()>;

    /// Rejects a state whose length is not [`ValueApproximator::state_size`].
    fn check_state(&self, state: ArrayView1<f32>) -> Result<()> {
        if state.len() != self.state_size() {
            return Err(DqnError::dimension_mismatch(
                format!("state of length {}", self.state_size()),
                format!("state of length {}", state.len()),
            ));
        }
        Ok(())
    }
}

/// Index of the largest value; ties resolve to the lowest index and NaN entries are skipped.
/// Returns `None` when no entry is comparable.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Largest value, ignoring NaN entries. Returns `None` when no entry is comparable.
pub fn max_value(values: ArrayView1<f32>) -> Option<f32> {
    argmax(values).map(|i| values[i])
}
