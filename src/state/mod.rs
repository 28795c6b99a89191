//! Host-facing world model: snapshot structs and the math they carry.

pub mod math;
pub mod snapshot;

pub use math::{Rotator, Vec3};
pub use snapshot::{BallState, CarState, GameStateSnapshot, PhysicsState, SnapshotError};
