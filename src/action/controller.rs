//! The controller command consumed by the host.

use serde::{Deserialize, Serialize};

/// One tick's worth of control input for the host.
///
/// Analog fields are always within [-1, 1] when produced by a decoder; the
/// host applies them without further clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerCommand {
    pub throttle: f32,
    pub steer: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
    pub handbrake: bool,
}

impl ControllerCommand {
    /// True if every analog field lies within [-1, 1].
    pub fn in_range(&self) -> bool {
        [self.throttle, self.steer, self.pitch, self.yaw, self.roll]
            .iter()
            .all(|v| (-1.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_neutral_and_in_range() {
        let cmd = ControllerCommand::default();
        assert_eq!(cmd.throttle, 0.0);
        assert!(!cmd.jump && !cmd.boost && !cmd.handbrake);
        assert!(cmd.in_range());
    }

    #[test]
    fn out_of_range_detected() {
        let cmd = ControllerCommand {
            steer: 1.5,
            ..ControllerCommand::default()
        };
        assert!(!cmd.in_range());
    }
}
