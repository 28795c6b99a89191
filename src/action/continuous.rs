//! Continuous 8-dim action mapping.
//!
//! Raw action layout:
//!
//! ```text
//! [0] throttle   [1] steer   [2] pitch   [3] yaw   [4] roll
//! [5] jump       [6] boost   [7] handbrake
//! ```
//!
//! Analog dims clamp to [-1, 1]; the last three become booleans via the
//! canonical `value > 0` threshold.

use super::{check_shape, ActionDecoder, ControllerCommand, DecodeError};

/// Raw action length for the continuous mapping.
pub const ACTION_DIM: usize = 8;

/// Decoder for policies emitting one continuous value per control field.
pub struct ContinuousDecoder;

impl ActionDecoder for ContinuousDecoder {
    fn action_dim(&self) -> usize {
        ACTION_DIM
    }

    fn decode(&self, action: &[f32]) -> Result<ControllerCommand, DecodeError> {
        check_shape(action, ACTION_DIM)?;
        Ok(ControllerCommand {
            throttle: action[0].clamp(-1.0, 1.0),
            steer: action[1].clamp(-1.0, 1.0),
            pitch: action[2].clamp(-1.0, 1.0),
            yaw: action[3].clamp(-1.0, 1.0),
            roll: action[4].clamp(-1.0, 1.0),
            jump: action[5] > 0.0,
            boost: action[6] > 0.0,
            handbrake: action[7] > 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_within_range() {
        let cmd = ContinuousDecoder
            .decode(&[0.5, -0.25, 1.0, -1.0, 0.0, 1.0, -1.0, 0.0])
            .unwrap();
        assert_eq!(cmd.throttle, 0.5);
        assert_eq!(cmd.steer, -0.25);
        assert!(cmd.jump);
        assert!(!cmd.boost);
        assert!(!cmd.handbrake);
    }

    #[test]
    fn boundary_values_clamp() {
        // Throttle 2.0 must decode to exactly 1.0.
        let cmd = ContinuousDecoder
            .decode(&[2.0, -3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(cmd.throttle, 1.0);
        assert_eq!(cmd.steer, -1.0);
        assert!(cmd.in_range());
    }

    #[test]
    fn boolean_threshold_is_strictly_positive() {
        let cmd = ContinuousDecoder
            .decode(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.001, -0.001])
            .unwrap();
        assert!(!cmd.jump, "0.0 is not > 0");
        assert!(cmd.boost);
        assert!(!cmd.handbrake);
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(
            ContinuousDecoder.decode(&[0.0; 7]).unwrap_err(),
            DecodeError::ActionShape {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn nan_rejected() {
        let mut action = [0.0f32; 8];
        action[3] = f32::NAN;
        assert_eq!(
            ContinuousDecoder.decode(&action).unwrap_err(),
            DecodeError::NonFinite { index: 3 }
        );
    }

    #[test]
    fn decoding_is_deterministic() {
        let action = [0.3, -0.7, 0.1, 0.0, -0.2, 1.0, 1.0, -1.0];
        assert_eq!(
            ContinuousDecoder.decode(&action).unwrap(),
            ContinuousDecoder.decode(&action).unwrap()
        );
    }
}
