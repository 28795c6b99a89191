//! Discretized single-index action mapping.
//!
//! The raw action is one float: a bucket index, rounded to the nearest
//! integer, into a fixed table of controller commands built once at
//! construction. The table covers:
//!
//! - 24 ground entries: throttle {-1, 0, 1} x steer {-1, 0, 1} x
//!   boost {off, on} x handbrake {off, on}, with boost only paired with
//!   full throttle (boosting is a forward input in the simulation);
//!   pitch/yaw/roll zero, no jump.
//! - 106 air entries: pitch {-1, 0, 1} x yaw {-1, 0, 1} x roll {-1, 0, 1} x
//!   jump {off, on} x boost {off, on}, minus the two entries with zero
//!   rotation and no jump (those duplicate ground commands); throttle
//!   mirrors boost so the wheels agree with the thruster on landing,
//!   steer/handbrake zero.
//!
//! 130 entries total. Entry order is the nested iteration order above and is
//! part of the frozen training contract.

use super::{check_shape, ActionDecoder, ControllerCommand, DecodeError};

/// Number of entries in the generated table.
pub const TABLE_LEN: usize = 130;

const TERNARY: [f32; 3] = [-1.0, 0.0, 1.0];
const TOGGLE: [bool; 2] = [false, true];

/// Decoder for policies emitting a single discrete bucket index.
pub struct LookupDecoder {
    table: Vec<ControllerCommand>,
}

impl LookupDecoder {
    pub fn new() -> LookupDecoder {
        LookupDecoder {
            table: build_table(),
        }
    }

    /// Number of commands in the table.
    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Direct table access for tests and tooling.
    pub fn entry(&self, index: usize) -> Option<&ControllerCommand> {
        self.table.get(index)
    }
}

impl Default for LookupDecoder {
    fn default() -> Self {
        LookupDecoder::new()
    }
}

impl ActionDecoder for LookupDecoder {
    fn action_dim(&self) -> usize {
        1
    }

    fn decode(&self, action: &[f32]) -> Result<ControllerCommand, DecodeError> {
        check_shape(action, 1)?;
        let index = action[0].round() as i64;
        if index < 0 || index as usize >= self.table.len() {
            return Err(DecodeError::IndexOutOfRange {
                index,
                table_len: self.table.len(),
            });
        }
        Ok(self.table[index as usize])
    }
}

/// Builds the fixed command table; see the module header for the rules.
fn build_table() -> Vec<ControllerCommand> {
    let mut table = Vec::with_capacity(TABLE_LEN);

    for &throttle in &TERNARY {
        for &steer in &TERNARY {
            for &boost in &TOGGLE {
                for &handbrake in &TOGGLE {
                    if boost && throttle != 1.0 {
                        continue;
                    }
                    table.push(ControllerCommand {
                        throttle,
                        steer,
                        boost,
                        handbrake,
                        ..ControllerCommand::default()
                    });
                }
            }
        }
    }

    for &pitch in &TERNARY {
        for &yaw in &TERNARY {
            for &roll in &TERNARY {
                for &jump in &TOGGLE {
                    for &boost in &TOGGLE {
                        if pitch == 0.0 && yaw == 0.0 && roll == 0.0 && !jump {
                            continue;
                        }
                        table.push(ControllerCommand {
                            throttle: if boost { 1.0 } else { 0.0 },
                            pitch,
                            yaw,
                            roll,
                            jump,
                            boost,
                            ..ControllerCommand::default()
                        });
                    }
                }
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_expected_size() {
        let dec = LookupDecoder::new();
        assert_eq!(dec.table_len(), TABLE_LEN);
    }

    #[test]
    fn first_entry_is_full_reverse() {
        // Nested order starts at throttle=-1, steer=-1, boost=off, hb=off.
        let dec = LookupDecoder::new();
        let cmd = dec.decode(&[0.0]).unwrap();
        assert_eq!(cmd.throttle, -1.0);
        assert_eq!(cmd.steer, -1.0);
        assert!(!cmd.boost && !cmd.handbrake && !cmd.jump);
    }

    #[test]
    fn ground_entries_never_jump_or_rotate() {
        let dec = LookupDecoder::new();
        for i in 0..24 {
            let cmd = dec.entry(i).unwrap();
            assert!(!cmd.jump, "ground entry {} jumps", i);
            assert_eq!((cmd.pitch, cmd.yaw, cmd.roll), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn boost_implies_full_throttle_everywhere() {
        let dec = LookupDecoder::new();
        for i in 0..dec.table_len() {
            let cmd = dec.entry(i).unwrap();
            if cmd.boost {
                assert_eq!(cmd.throttle, 1.0, "entry {} boosts without throttle", i);
            }
        }
    }

    #[test]
    fn no_duplicate_entries() {
        let dec = LookupDecoder::new();
        for i in 0..dec.table_len() {
            for j in (i + 1)..dec.table_len() {
                assert_ne!(dec.entry(i), dec.entry(j), "entries {} and {} collide", i, j);
            }
        }
    }

    #[test]
    fn every_entry_in_range() {
        let dec = LookupDecoder::new();
        for i in 0..dec.table_len() {
            assert!(dec.entry(i).unwrap().in_range(), "entry {} out of range", i);
        }
    }

    #[test]
    fn index_rounds_to_nearest() {
        let dec = LookupDecoder::new();
        assert_eq!(dec.decode(&[1.4]).unwrap(), dec.decode(&[1.0]).unwrap());
        assert_eq!(dec.decode(&[1.6]).unwrap(), dec.decode(&[2.0]).unwrap());
    }

    #[test]
    fn out_of_range_index_rejected() {
        let dec = LookupDecoder::new();
        assert_eq!(
            dec.decode(&[130.0]).unwrap_err(),
            DecodeError::IndexOutOfRange {
                index: 130,
                table_len: TABLE_LEN
            }
        );
        assert!(matches!(
            dec.decode(&[-1.0]).unwrap_err(),
            DecodeError::IndexOutOfRange { index: -1, .. }
        ));
    }

    #[test]
    fn wrong_length_rejected() {
        let dec = LookupDecoder::new();
        assert_eq!(
            dec.decode(&[1.0, 2.0]).unwrap_err(),
            DecodeError::ActionShape {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn nan_index_rejected() {
        let dec = LookupDecoder::new();
        assert_eq!(
            dec.decode(&[f32::NAN]).unwrap_err(),
            DecodeError::NonFinite { index: 0 }
        );
    }
}
