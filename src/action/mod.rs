//! Raw policy action -> controller command decoding.
//!
//! A decoder owns one fixed mapping from the policy's raw output vector to a
//! `ControllerCommand` with every field in its legal range. Variants differ
//! in whether action dimensions are continuous or a single discretized
//! bucket index; there is no cross-variant fallback, and identical raw
//! actions always decode to identical commands.

pub mod continuous;
pub mod controller;
pub mod lookup;

pub use continuous::ContinuousDecoder;
pub use controller::ControllerCommand;
pub use lookup::LookupDecoder;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a raw action.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("raw action has {actual} dims, decoder expects {expected}")]
    ActionShape { expected: usize, actual: usize },

    #[error("raw action dim {index} is not finite")]
    NonFinite { index: usize },

    #[error("bucket index {index} outside lookup table of {table_len} entries")]
    IndexOutOfRange { index: i64, table_len: usize },
}

/// Decodes a fixed-length raw action into a controller command.
pub trait ActionDecoder: Send + Sync {
    /// Raw action length this decoder consumes.
    fn action_dim(&self) -> usize;

    /// Decodes one raw action, clamping/quantizing every output field into
    /// its legal range. Fails on wrong length or non-finite input; a NaN is
    /// never forwarded to the host.
    fn decode(&self, action: &[f32]) -> Result<ControllerCommand, DecodeError>;
}

/// Which decoder mapping an agent uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoderVariant {
    Continuous,
    Lookup,
}

/// Builds the decoder for a variant, fixed for the agent's lifetime.
pub fn build_decoder(variant: DecoderVariant) -> Box<dyn ActionDecoder> {
    match variant {
        DecoderVariant::Continuous => Box::new(ContinuousDecoder),
        DecoderVariant::Lookup => Box::new(LookupDecoder::new()),
    }
}

/// Checks the raw action length and that every value is finite.
pub(crate) fn check_shape(action: &[f32], expected: usize) -> Result<(), DecodeError> {
    if action.len() != expected {
        return Err(DecodeError::ActionShape {
            expected,
            actual: action.len(),
        });
    }
    for (index, v) in action.iter().enumerate() {
        if !v.is_finite() {
            return Err(DecodeError::NonFinite { index });
        }
    }
    Ok(())
}
