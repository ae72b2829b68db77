use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::Result;
use super::initialization::WeightInit;

/// A fully connected (dense) layer in a value network
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

/// Values recorded during a training forward pass, consumed by [`DenseLayer::backward`].
#[derive(Clone, Debug)]
pub struct LayerCache {
    pub input: Array1<f32>,
    pub pre_activation: Array1<f32>,
}

impl DenseLayer {
    /// Create a new dense layer with the given input size, output size, and activation function.
    /// Weights are drawn with the initialization recommended for the activation,
    /// biases start at zero.
    pub fn new<R: Rng + ?Sized>(input_size: usize, output_size: usize, activation: Activation, rng: &mut R) -> Result<Self> {
        Self::with_init(input_size, output_size, activation, WeightInit::for_activation(&activation), rng)
    }

    pub fn with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        let weights = init.initialize_weights((input_size, output_size), rng)?;
        let biases = init.initialize_biases(output_size);
        Ok(DenseLayer { weights, biases, activation })
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    /// Forward pass without recording anything.
    pub fn forward(&self, input: ArrayView1<f32>) -> Array1<f32> {
        let mut output = input.dot(&self.weights) + &self.biases;
        self.activation.apply(&mut output);
        output
    }

    /// Forward pass that also returns the values needed for backpropagation.
    pub fn forward_cached(&self, input: ArrayView1<f32>) -> (Array1<f32>, LayerCache) {
        let pre_activation = input.dot(&self.weights) + &self.biases;
        let mut output = pre_activation.clone();
        self.activation.apply(&mut output);
        let cache = LayerCache { input: input.to_owned(), pre_activation };
        (output, cache)
    }

    /// Backpropagate `output_error` (dLoss/dOutput) through this layer.
    ///
    /// Returns `(input_error, weight_gradients, bias_gradients)`.
    pub fn backward(&self, cache: &LayerCache, output_error: ArrayView1<f32>) -> (Array1<f32>, Array2<f32>, Array1<f32>) {
        let adjusted_error = &output_error * &self.activation.derivative(cache.pre_activation.view());
        let weight_gradients = cache
            .input
            .view()
            .insert_axis(Axis(1))
            .dot(&adjusted_error.view().insert_axis(Axis(0)));
        let input_error = self.weights.dot(&adjusted_error);
        (input_error, weight_gradients, adjusted_error)
    }
}
