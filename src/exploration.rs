//! Epsilon-greedy exploration with geometric decay.

use rand::Rng;

use crate::error::{DqnError, Result};

/// Picks a uniformly random action with probability `epsilon`, the greedy one otherwise.
///
/// `epsilon` only moves down: each [`EpsilonGreedy::decay`] multiplies it by
/// `epsilon_decay` and clamps at `epsilon_min`.
///
/// ```rust
/// use deepq::exploration::EpsilonGreedy;
///
/// let mut policy = EpsilonGreedy::new(1.0, 0.01, 0.5).unwrap();
/// for _ in 0..10 {
///     policy.decay();
/// }
/// assert_eq!(policy.epsilon(), 0.01);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f32, epsilon_min: f32, epsilon_decay: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon_min) {
            return Err(DqnError::invalid_parameter(
                "epsilon_min".to_string(),
                format!("must lie in [0, 1], got {}", epsilon_min),
            ));
        }
        if !(epsilon_min..=1.0).contains(&epsilon) {
            return Err(DqnError::invalid_parameter(
                "epsilon".to_string(),
                format!("must lie in [{}, 1], got {}", epsilon_min, epsilon),
            ));
        }
        if !(epsilon_decay > 0.0 && epsilon_decay < 1.0) {
            return Err(DqnError::invalid_parameter(
                "epsilon_decay".to_string(),
                format!("must lie in (0, 1), got {}", epsilon_decay),
            ));
        }
        Ok(EpsilonGreedy { epsilon, epsilon_min, epsilon_decay })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn epsilon_min(&self) -> f32 {
        self.epsilon_min
    }

    pub fn epsilon_decay(&self) -> f32 {
        self.epsilon_decay
    }

    /// Choose between a random action in `[0, action_count)` and `greedy_action`.
    ///
    /// With `epsilon == 0` the random source is never touched.
    pub fn select<R: Rng + ?Sized>(&self, action_count: usize, greedy_action: usize, rng: &mut R) -> usize {
        if self.epsilon > 0.0 && action_count > 0 && rng.gen::<f32>() < self.epsilon {
            rng.gen_range(0..action_count)
        } else {
            greedy_action
        }
    }

    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        EpsilonGreedy {
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.9993,
        }
    }
}
