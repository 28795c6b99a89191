//! Snapshot -> observation-vector encoding.
//!
//! An encoder turns one `GameStateSnapshot` into a fixed-length f32 vector
//! whose length and field order are frozen at policy-training time. Two
//! variants exist; exactly one is selected per agent at configuration time
//! and held for the process lifetime. Both are deterministic pure mappings:
//! the same snapshot always encodes to the same vector.

pub mod advanced;
pub mod default;
pub mod history;

pub use advanced::AdvancedEncoder;
pub use default::DefaultEncoder;
pub use history::ObservationHistory;

use serde::{Deserialize, Serialize};

use crate::state::{CarState, GameStateSnapshot, SnapshotError, Vec3};

/// Position and velocity scale: the simulation's top car speed.
pub const POS_NORM: f32 = 2300.0;
pub const VEL_NORM: f32 = 2300.0;

/// Angular velocity scale: the simulation's max angular speed.
pub const ANG_VEL_NORM: f32 = 5.5;

/// Boost tank scale.
pub const BOOST_NORM: f32 = 100.0;

/// Encodes a `GameStateSnapshot` into a fixed-length f32 observation.
pub trait ObservationEncoder: Send + Sync {
    /// Number of f32 values produced per snapshot.
    fn obs_dim(&self) -> usize;

    /// Encodes one snapshot. Fails fast on malformed snapshots rather than
    /// producing a partially-zeroed vector.
    fn encode(&self, snapshot: &GameStateSnapshot) -> Result<Vec<f32>, SnapshotError>;
}

/// Which encoder layout an agent uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderVariant {
    Default,
    Advanced,
}

/// Builds the encoder for a variant, fixed for the agent's lifetime.
pub fn build_encoder(variant: EncoderVariant, max_agent_slots: usize) -> Box<dyn ObservationEncoder> {
    match variant {
        EncoderVariant::Default => Box::new(DefaultEncoder::new(max_agent_slots)),
        EncoderVariant::Advanced => Box::new(AdvancedEncoder::new(max_agent_slots)),
    }
}

/// Selects up to `max_slots` other cars, nearest to the controlled car
/// first. Ties on distance break by ascending car index so re-encoding the
/// same snapshot is bitwise reproducible. Demolished cars are skipped.
pub(crate) fn nearest_others(snapshot: &GameStateSnapshot, max_slots: usize) -> Vec<&CarState> {
    let own_pos = snapshot.cars[snapshot.controlled_index].physics.position;

    let mut ranked: Vec<(f32, usize)> = snapshot
        .cars
        .iter()
        .enumerate()
        .filter(|(i, car)| *i != snapshot.controlled_index && !car.demolished)
        .map(|(i, car)| (car.physics.position.dist(own_pos), i))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    ranked.truncate(max_slots);

    ranked.into_iter().map(|(_, i)| &snapshot.cars[i]).collect()
}

/// Appends a Vec3 scaled by `1.0 / norm`.
pub(crate) fn push_vec3(out: &mut Vec<f32>, v: Vec3, norm: f32) {
    out.push(v.x / norm);
    out.push(v.y / norm);
    out.push(v.z / norm);
}
