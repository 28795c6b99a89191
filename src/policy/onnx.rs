//! ONNX-backed policy via ONNX Runtime.
//!
//! Loads a trained model once at startup with the `ort` crate and runs
//! `[1, input_dim] -> [1, output_dim]` inference per decision tick. Only
//! compiled with the `neural` feature.

use ort::session::{builder::GraphOptimizationLevel, Session};

use super::{Policy, PolicyError};

/// A policy backed by a loaded ONNX session.
///
/// The session is owned exclusively for the process lifetime; the declared
/// input/output dims come from the training-time contract and are verified
/// against every inference result by the wrapping `PolicyAdapter`.
pub struct OnnxPolicy {
    session: Session,
    input_dim: usize,
    output_dim: usize,
}

impl OnnxPolicy {
    /// Loads the model at `path`. Declared dims must match the shapes the
    /// model was exported with.
    pub fn load(path: &str, input_dim: usize, output_dim: usize) -> Result<OnnxPolicy, PolicyError> {
        let session = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(4))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| PolicyError::Inference(format!("failed to load {}: {}", path, e)))?;
        eprintln!("info string loaded ONNX policy from {}", path);
        Ok(OnnxPolicy {
            session,
            input_dim,
            output_dim,
        })
    }
}

impl Policy for OnnxPolicy {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn infer(&mut self, obs: &[f32]) -> Result<Vec<f32>, PolicyError> {
        use ort::value::Value;

        let input = Value::from_array(([1, self.input_dim], obs.to_vec()))
            .map_err(|e| PolicyError::Inference(e.to_string()))?;
        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(|e| PolicyError::Inference(e.to_string()))?;
        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PolicyError::Inference(e.to_string()))?;
        Ok(data.to_vec())
    }
}
