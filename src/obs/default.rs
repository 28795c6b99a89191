//! Minimal observation layout.
//!
//! Produces a `24 + 9 * max_agent_slots` float vector:
//!
//! ```text
//! [0:3]   ball position        / 2300
//! [3:6]   ball velocity        / 2300
//! [6:9]   ball angular vel.    / 5.5
//! [9:12]  self position        / 2300
//! [12:15] self velocity        / 2300
//! [15:18] self angular vel.    / 5.5
//! [18:21] self rotation (pitch, yaw, roll) / PI
//! [21]    self boost / 100
//! [22]    on_ground
//! [23]    has_flip
//! ```
//!
//! followed by one 9-float slot per tracked other car, nearest first
//! (zero-padded when fewer cars than slots are present):
//!
//! ```text
//! [0]   occupied
//! [1]   teammate
//! [2:5] position relative to self / 2300
//! [5:8] velocity relative to self / 2300
//! [8]   boost / 100
//! ```

use std::f32::consts::PI;

use super::{nearest_others, push_vec3, ObservationEncoder, ANG_VEL_NORM, BOOST_NORM, POS_NORM, VEL_NORM};
use crate::state::{GameStateSnapshot, SnapshotError};

/// Floats before the agent slots begin.
pub const HEADER_LEN: usize = 24;

/// Floats per tracked-agent slot.
pub const SLOT_LEN: usize = 9;

/// The minimal encoder variant.
pub struct DefaultEncoder {
    max_agent_slots: usize,
    obs_dim: usize,
}

impl DefaultEncoder {
    pub fn new(max_agent_slots: usize) -> DefaultEncoder {
        DefaultEncoder {
            max_agent_slots,
            obs_dim: HEADER_LEN + SLOT_LEN * max_agent_slots,
        }
    }
}

impl ObservationEncoder for DefaultEncoder {
    fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    fn encode(&self, snapshot: &GameStateSnapshot) -> Result<Vec<f32>, SnapshotError> {
        let (ball, own) = snapshot.validated()?;
        let mut out = Vec::with_capacity(self.obs_dim);

        push_vec3(&mut out, ball.physics.position, POS_NORM);
        push_vec3(&mut out, ball.physics.velocity, VEL_NORM);
        push_vec3(&mut out, ball.physics.angular_velocity, ANG_VEL_NORM);

        push_vec3(&mut out, own.physics.position, POS_NORM);
        push_vec3(&mut out, own.physics.velocity, VEL_NORM);
        push_vec3(&mut out, own.physics.angular_velocity, ANG_VEL_NORM);
        out.push(own.physics.rotation.pitch / PI);
        out.push(own.physics.rotation.yaw / PI);
        out.push(own.physics.rotation.roll / PI);
        out.push(own.boost / BOOST_NORM);
        out.push(if own.on_ground { 1.0 } else { 0.0 });
        out.push(if own.has_flip { 1.0 } else { 0.0 });

        for other in nearest_others(snapshot, self.max_agent_slots) {
            out.push(1.0);
            out.push(if other.team == own.team { 1.0 } else { 0.0 });
            push_vec3(&mut out, other.physics.position - own.physics.position, POS_NORM);
            push_vec3(&mut out, other.physics.velocity - own.physics.velocity, VEL_NORM);
            out.push(other.boost / BOOST_NORM);
        }
        out.resize(self.obs_dim, 0.0);

        Ok(out)
    }
}
