use ndarray::{Array1, Array2, ArrayView1};
use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use bincode::{serialize, deserialize};

use crate::activations::Activation;
use crate::approximator::{LayerParameters, Parameters, ValueApproximator};
use crate::error::{DqnError, Result};
use crate::layers::{DenseLayer, LayerCache};
use crate::optimizer::{Optimizer, OptimizerConfig, OptimizerWrapper};

/// A feed-forward value network: dense layers, an optimizer, and a learning rate.
///
/// The first layer's input size is the observation dimensionality `N` and the
/// last layer's output size is the action count `A`. Training minimizes the
/// mean-squared error over all `A` outputs for one sample at a time.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
    pub learning_rate: f32,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes and activations.
    /// `activations` has one entry per layer, i.e. `layer_sizes.len() - 1` entries.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerConfig,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DqnError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("need at least input and output sizes, got {:?}", layer_sizes),
            ));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(DqnError::invalid_parameter(
                "activations".to_string(),
                format!("expected {} activations, got {}", layer_sizes.len() - 1, activations.len()),
            ));
        }
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(DqnError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be positive and finite, got {}", learning_rate),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, &mut *rng))
            .collect::<Result<Vec<_>>>()?;
        let optimizer = optimizer.build(&layers);

        Ok(NeuralNetwork { layers, optimizer, learning_rate })
    }

    /// A Q-network: ReLU on every hidden layer, linear output.
    pub fn q_network<R: Rng + ?Sized>(
        state_size: usize,
        hidden: &[usize],
        action_count: usize,
        optimizer: OptimizerConfig,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layer_sizes = Vec::with_capacity(hidden.len() + 2);
        layer_sizes.push(state_size);
        layer_sizes.extend_from_slice(hidden);
        layer_sizes.push(action_count);

        let mut activations = vec![Activation::Relu; hidden.len()];
        activations.push(Activation::Linear);

        Self::new(&layer_sizes, &activations, optimizer, learning_rate, rng)
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.layers.iter().map(|l| l.input_size()).collect();
        if let Some(last) = self.layers.last() {
            sizes.push(last.output_size());
        }
        sizes
    }

    /// Perform a forward pass for a single input vector. The input length is not checked.
    pub fn forward(&self, input: ArrayView1<f32>) -> Array1<f32> {
        let mut current = input.to_owned();
        for layer in &self.layers {
            current = layer.forward(current.view());
        }
        current
    }

    fn forward_cached(&self, input: ArrayView1<f32>) -> (Array1<f32>, Vec<LayerCache>) {
        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = input.to_owned();
        for layer in &self.layers {
            let (output, cache) = layer.forward_cached(current.view());
            caches.push(cache);
            current = output;
        }
        (current, caches)
    }

    /// Compute gradients of every layer for one sample by backpropagation.
    fn backward(&self, caches: &[LayerCache], output_error: Array1<f32>) -> Vec<(Array2<f32>, Array1<f32>)> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_error;

        for (layer, cache) in self.layers.iter().zip(caches).rev() {
            let (input_error, weight_gradients, bias_gradients) = layer.backward(cache, current_error.view());
            gradients.push((weight_gradients, bias_gradients));
            current_error = input_error;
        }

        gradients.reverse();
        gradients
    }

    /// Save the whole network, optimizer state included.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a network written by [`NeuralNetwork::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let deserialized: Self = deserialize(&buffer)?;
        Ok(deserialized)
    }
}

impl ValueApproximator for NeuralNetwork {
    fn state_size(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input_size())
    }

    fn action_count(&self) -> usize {
        self.layers.last().map_or(0, |l| l.output_size())
    }

    fn predict(&self, state: ArrayView1<f32>) -> Result<Array1<f32>> {
        self.check_state(state)?;
        Ok(self.forward(state))
    }

    fn fit(&mut self, state: ArrayView1<f32>, target: ArrayView1<f32>) -> Result<f32> {
        self.check_state(state)?;
        let action_count = self.action_count();
        if target.len() != action_count {
            return Err(DqnError::dimension_mismatch(
                format!("target of length {}", action_count),
                format!("target of length {}", target.len()),
            ));
        }

        let (output, caches) = self.forward_cached(state);
        let diff = &output - &target;
        let loss = diff.mapv(|d| d * d).mean().unwrap_or(0.0);

        // d/dy of mean((y - t)^2)
        let output_error = diff * (2.0 / action_count as f32);
        let gradients = self.backward(&caches, output_error);

        let learning_rate = self.learning_rate;
        for (index, (layer, (weight_gradients, bias_gradients))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(index, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &bias_gradients, learning_rate);
        }
        self.optimizer.finish_step();

        Ok(loss)
    }

    fn parameters(&self) -> Parameters {
        Parameters {
            layers: self
                .layers
                .iter()
                .map(|l| LayerParameters { weights: l.weights.clone(), biases: l.biases.clone() })
                .collect(),
        }
    }

    /// Restored weights start with fresh optimizer moments.
    fn set_parameters(&mut self, parameters: &Parameters) -> Result<()> {
        if parameters.layers.len() != self.layers.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} layers", self.layers.len()),
                format!("{} layers", parameters.layers.len()),
            ));
        }
        for (i, (layer, p)) in self.layers.iter().zip(&parameters.layers).enumerate() {
            if layer.weights.dim() != p.weights.dim() || layer.biases.dim() != p.biases.dim() {
                return Err(DqnError::dimension_mismatch(
                    format!("layer {} weights {:?}, biases {}", i, layer.weights.dim(), layer.biases.len()),
                    format!("layer {} weights {:?}, biases {}", i, p.weights.dim(), p.biases.len()),
                ));
            }
        }

        for (layer, p) in self.layers.iter_mut().zip(&parameters.layers) {
            layer.weights.assign(&p.weights);
            layer.biases.assign(&p.biases);
        }
        self.optimizer.reset();
        Ok(())
    }
}
