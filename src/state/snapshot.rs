//! Game-state snapshots supplied by the host.
//!
//! A `GameStateSnapshot` is an immutable point-in-time view of the simulated
//! world as the host hands it over each tick: the ball, every car, the index
//! of the car this agent controls, and the simulation tick counter. The core
//! never mutates a snapshot; it only reads it during encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::math::{Rotator, Vec3};

/// Kinematic state shared by the ball and every car.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub rotation: Rotator,
}

impl PhysicsState {
    /// True if every component of every field is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.angular_velocity.is_finite()
            && self.rotation.is_finite()
    }
}

/// One car in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub physics: PhysicsState,
    /// Boost tank, 0..=100.
    pub boost: f32,
    pub on_ground: bool,
    pub has_flip: bool,
    /// Team identifier; cars sharing the controlled car's team are teammates.
    pub team: u8,
    pub demolished: bool,
}

impl CarState {
    /// A resting car at the origin with a full boost tank.
    pub fn resting(team: u8) -> CarState {
        CarState {
            physics: PhysicsState::default(),
            boost: 100.0,
            on_ground: true,
            has_flip: true,
            team,
            demolished: false,
        }
    }
}

/// The ball in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallState {
    pub physics: PhysicsState,
}

/// Point-in-time world state for one simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    /// Simulation tick counter; non-decreasing across calls for one agent.
    pub tick: u64,
    /// Ball state; `None` means the host sent a packet without ball data.
    pub ball: Option<BallState>,
    /// Every car in the match, in the host's order.
    pub cars: Vec<CarState>,
    /// Index into `cars` of the car this agent controls.
    pub controlled_index: usize,
}

/// Errors raised when a snapshot is missing required sub-state or carries
/// physically invalid values. Encoding fails fast on these rather than
/// producing a partially-zeroed observation.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("snapshot has no ball state")]
    MissingBall,

    #[error("controlled car index {index} out of range ({cars} cars in snapshot)")]
    ControlledIndexOutOfRange { index: usize, cars: usize },

    #[error("non-finite physics values on {subject}")]
    NonFinitePhysics { subject: String },

    #[error("boost {value} out of range 0..=100 on car {index}")]
    BoostOutOfRange { index: usize, value: f32 },

    #[error("tick counter went backwards: {current} after {last}")]
    NonMonotonicTick { last: u64, current: u64 },
}

impl GameStateSnapshot {
    /// Validates the snapshot and returns the ball and controlled car.
    ///
    /// Checks presence of required sub-state and physical validity of every
    /// car the encoder may read. Demolished cars other than the controlled
    /// one are exempt from the finite check since encoders skip them.
    pub fn validated(&self) -> Result<(&BallState, &CarState), SnapshotError> {
        let ball = self.ball.as_ref().ok_or(SnapshotError::MissingBall)?;
        if !ball.physics.is_finite() {
            return Err(SnapshotError::NonFinitePhysics {
                subject: "ball".to_string(),
            });
        }

        let controlled = self.cars.get(self.controlled_index).ok_or(
            SnapshotError::ControlledIndexOutOfRange {
                index: self.controlled_index,
                cars: self.cars.len(),
            },
        )?;

        for (i, car) in self.cars.iter().enumerate() {
            if car.demolished && i != self.controlled_index {
                continue;
            }
            if !car.physics.is_finite() {
                return Err(SnapshotError::NonFinitePhysics {
                    subject: format!("car {}", i),
                });
            }
            if !(0.0..=100.0).contains(&car.boost) {
                return Err(SnapshotError::BoostOutOfRange {
                    index: i,
                    value: car.boost,
                });
            }
        }

        Ok((ball, controlled))
    }
}
