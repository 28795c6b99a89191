//! Vector and rotation math for snapshot geometry.
//!
//! `Vec3` is a plain 3-component float vector; `Rotator` holds Euler angles
//! in radians (yaw about +Z, pitch about +Y with nose-up positive, roll
//! about the forward axis) matching the host simulation's convention.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 3-component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn dist(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// True if all three components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Euler-angle rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Rotator {
        Rotator { pitch, yaw, roll }
    }

    /// Unit vector along the nose of the agent.
    ///
    /// At zero rotation this is +X; pure pitch of pi/2 points it at +Z.
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cp * cy, cp * sy, sp)
    }

    /// Unit vector out of the roof of the agent.
    ///
    /// At zero rotation this is +Z.
    pub fn up(self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        let (sr, cr) = self.roll.sin_cos();
        Vec3::new(-cr * cy * sp - sr * sy, -cr * sy * sp + sr * cy, cp * cr)
    }

    /// True if all three angles are finite.
    pub fn is_finite(self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }
}
