//! # Activation Functions Module
//!
//! Non-linearities used by the dense layers of a value network.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used by the output layer so action-values are unbounded
//! - **Tanh**: hyperbolic tangent
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! ```rust
//! use deepq::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![1.0, -0.5, 0.0, 2.0];
//! Activation::Relu.apply(&mut data);
//! assert_eq!(data, array![1.0, 0.0, 0.0, 2.0]);
//! ```

pub mod functions;

pub use functions::Activation;
