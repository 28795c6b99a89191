//! The policy boundary.
//!
//! A `Policy` is the externally trained decision function: an opaque
//! capability taking a flat observation and returning a flat action. It is
//! injected at configuration time and never interpreted semantically by this
//! crate. `PolicyAdapter` wraps it with shape validation on both sides of
//! every call, so layout drift between encoder/decoder and loaded weights is
//! caught instead of silently degrading the policy's behavior.

#[cfg(feature = "neural")]
pub mod onnx;

#[cfg(feature = "neural")]
pub use onnx::OnnxPolicy;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors raised at the policy boundary.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("observation has {actual} dims, policy expects {expected}")]
    InputShape { expected: usize, actual: usize },

    #[error("policy returned {actual} dims, expected {expected}")]
    OutputShape { expected: usize, actual: usize },

    #[error("policy invocation failed: {0}")]
    Inference(String),
}

/// An externally supplied decision function.
///
/// Construction (weight loading) happens once at startup; `infer` is then
/// called synchronously on the per-tick hot path and must complete within
/// the host's tick budget.
pub trait Policy: Send {
    /// Declared observation length.
    fn input_dim(&self) -> usize;

    /// Declared action length.
    fn output_dim(&self) -> usize;

    /// Maps one observation to one raw action.
    fn infer(&mut self, obs: &[f32]) -> Result<Vec<f32>, PolicyError>;
}

/// Shape-validating wrapper around a boxed policy.
pub struct PolicyAdapter {
    policy: Box<dyn Policy>,
    input_dim: usize,
    output_dim: usize,
}

impl PolicyAdapter {
    pub fn new(policy: Box<dyn Policy>) -> PolicyAdapter {
        let input_dim = policy.input_dim();
        let output_dim = policy.output_dim();
        PolicyAdapter {
            policy,
            input_dim,
            output_dim,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Runs the wrapped policy, failing fast on any shape mismatch. The
    /// output is never reshaped or truncated to fit.
    pub fn infer(&mut self, obs: &[f32]) -> Result<Vec<f32>, PolicyError> {
        if obs.len() != self.input_dim {
            return Err(PolicyError::InputShape {
                expected: self.input_dim,
                actual: obs.len(),
            });
        }
        let action = self.policy.infer(obs)?;
        if action.len() != self.output_dim {
            return Err(PolicyError::OutputShape {
                expected: self.output_dim,
                actual: action.len(),
            });
        }
        Ok(action)
    }
}

/// Uniform-random policy for harness runs and tests; stands in when no
/// trained model is available.
pub struct RandomPolicy {
    input_dim: usize,
    output_dim: usize,
    low: f32,
    high: f32,
    rng: SmallRng,
}

impl RandomPolicy {
    /// Draws every action dim uniformly from [-1, 1]. Seed 0 uses entropy.
    pub fn new(input_dim: usize, output_dim: usize, seed: u64) -> RandomPolicy {
        RandomPolicy::bounded(input_dim, output_dim, -1.0, 1.0, seed)
    }

    /// Draws every action dim uniformly from [low, high]; used when the
    /// paired decoder expects something other than analog values, e.g.
    /// bucket indexes for the lookup mapping.
    pub fn bounded(
        input_dim: usize,
        output_dim: usize,
        low: f32,
        high: f32,
        seed: u64,
    ) -> RandomPolicy {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        RandomPolicy {
            input_dim,
            output_dim,
            low,
            high,
            rng,
        }
    }
}

impl Policy for RandomPolicy {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn infer(&mut self, _obs: &[f32]) -> Result<Vec<f32>, PolicyError> {
        Ok((0..self.output_dim)
            .map(|_| self.rng.gen_range(self.low..=self.high))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes a constant action; configurable dims for shape tests.
    struct FixedPolicy {
        input_dim: usize,
        action: Vec<f32>,
    }

    impl Policy for FixedPolicy {
        fn input_dim(&self) -> usize {
            self.input_dim
        }

        fn output_dim(&self) -> usize {
            self.action.len()
        }

        fn infer(&mut self, _obs: &[f32]) -> Result<Vec<f32>, PolicyError> {
            Ok(self.action.clone())
        }
    }

    /// Claims one output dim but returns another; must be caught.
    struct LyingPolicy;

    impl Policy for LyingPolicy {
        fn input_dim(&self) -> usize {
            4
        }

        fn output_dim(&self) -> usize {
            8
        }

        fn infer(&mut self, _obs: &[f32]) -> Result<Vec<f32>, PolicyError> {
            Ok(vec![0.0; 3])
        }
    }

    #[test]
    fn matching_shapes_pass_through() {
        let mut adapter = PolicyAdapter::new(Box::new(FixedPolicy {
            input_dim: 4,
            action: vec![1.0, 2.0],
        }));
        assert_eq!(adapter.infer(&[0.0; 4]).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn short_observation_rejected() {
        let mut adapter = PolicyAdapter::new(Box::new(FixedPolicy {
            input_dim: 4,
            action: vec![0.0],
        }));
        assert_eq!(
            adapter.infer(&[0.0; 3]).unwrap_err(),
            PolicyError::InputShape {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn wrong_output_shape_rejected() {
        let mut adapter = PolicyAdapter::new(Box::new(LyingPolicy));
        assert_eq!(
            adapter.infer(&[0.0; 4]).unwrap_err(),
            PolicyError::OutputShape {
                expected: 8,
                actual: 3
            }
        );
    }

    #[test]
    fn random_policy_respects_dims_and_range() {
        let mut policy = RandomPolicy::new(6, 8, 42);
        let action = policy.infer(&[0.0; 6]).unwrap();
        assert_eq!(action.len(), 8);
        assert!(action.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn seeded_random_policy_reproducible() {
        let mut a = RandomPolicy::new(2, 4, 7);
        let mut b = RandomPolicy::new(2, 4, 7);
        assert_eq!(a.infer(&[0.0; 2]).unwrap(), b.infer(&[0.0; 2]).unwrap());
    }
}
