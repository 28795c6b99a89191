//! Derived-feature observation layout.
//!
//! Produces a `38 + 10 * max_agent_slots` float vector. The extra features
//! over the default layout are quantities the policy would otherwise have to
//! learn to derive: ball state relative to the agent, the agent's
//! orientation basis vectors, and scalar distance/speed.
//!
//! ```text
//! [0:3]   ball position        / 2300
//! [3:6]   ball velocity        / 2300
//! [6:9]   ball angular vel.    / 5.5
//! [9:12]  ball position  - self position / 2300
//! [12:15] ball velocity  - self velocity / 2300
//! [15]    distance to ball / 2300
//! [16:19] self position        / 2300
//! [19:22] self velocity        / 2300
//! [22:25] self angular vel.    / 5.5
//! [25:28] self rotation (pitch, yaw, roll) / PI
//! [28]    self boost / 100
//! [29]    on_ground
//! [30]    has_flip
//! [31:34] self forward unit vector
//! [34:37] self up unit vector
//! [37]    self speed / 2300
//! ```
//!
//! followed by one 10-float slot per tracked other car, nearest first
//! (zero-padded when absent): the default 9-float slot plus distance / 2300
//! appended.

use std::f32::consts::PI;

use super::{nearest_others, push_vec3, ObservationEncoder, ANG_VEL_NORM, BOOST_NORM, POS_NORM, VEL_NORM};
use crate::state::{GameStateSnapshot, SnapshotError};

/// Floats before the agent slots begin.
pub const HEADER_LEN: usize = 38;

/// Floats per tracked-agent slot.
pub const SLOT_LEN: usize = 10;

/// The derived-feature encoder variant.
pub struct AdvancedEncoder {
    max_agent_slots: usize,
    obs_dim: usize,
}

impl AdvancedEncoder {
    pub fn new(max_agent_slots: usize) -> AdvancedEncoder {
        AdvancedEncoder {
            max_agent_slots,
            obs_dim: HEADER_LEN + SLOT_LEN * max_agent_slots,
        }
    }
}

impl ObservationEncoder for AdvancedEncoder {
    fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    fn encode(&self, snapshot: &GameStateSnapshot) -> Result<Vec<f32>, SnapshotError> {
        let (ball, own) = snapshot.validated()?;
        let mut out = Vec::with_capacity(self.obs_dim);

        push_vec3(&mut out, ball.physics.position, POS_NORM);
        push_vec3(&mut out, ball.physics.velocity, VEL_NORM);
        push_vec3(&mut out, ball.physics.angular_velocity, ANG_VEL_NORM);

        let rel_pos = ball.physics.position - own.physics.position;
        push_vec3(&mut out, rel_pos, POS_NORM);
        push_vec3(&mut out, ball.physics.velocity - own.physics.velocity, VEL_NORM);
        out.push(rel_pos.length() / POS_NORM);

        push_vec3(&mut out, own.physics.position, POS_NORM);
        push_vec3(&mut out, own.physics.velocity, VEL_NORM);
        push_vec3(&mut out, own.physics.angular_velocity, ANG_VEL_NORM);
        out.push(own.physics.rotation.pitch / PI);
        out.push(own.physics.rotation.yaw / PI);
        out.push(own.physics.rotation.roll / PI);
        out.push(own.boost / BOOST_NORM);
        out.push(if own.on_ground { 1.0 } else { 0.0 });
        out.push(if own.has_flip { 1.0 } else { 0.0 });
        push_vec3(&mut out, own.physics.rotation.forward(), 1.0);
        push_vec3(&mut out, own.physics.rotation.up(), 1.0);
        out.push(own.physics.velocity.length() / VEL_NORM);

        for other in nearest_others(snapshot, self.max_agent_slots) {
            let rel = other.physics.position - own.physics.position;
            out.push(1.0);
            out.push(if other.team == own.team { 1.0 } else { 0.0 });
            push_vec3(&mut out, rel, POS_NORM);
            push_vec3(&mut out, other.physics.velocity - own.physics.velocity, VEL_NORM);
            out.push(other.boost / BOOST_NORM);
            out.push(rel.length() / POS_NORM);
        }
        out.resize(self.obs_dim, 0.0);

        Ok(out)
    }
}
