//! Core types shared by the stride crates

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a character.
///
/// Characters only ever rotate about +Y, and local forward is +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a transform facing `yaw` degrees about +Y
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: yaw_rotation(yaw),
        }
    }

    /// Local +Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Yaw in degrees, wrapped to [0, 360)
    pub fn yaw(&self) -> f32 {
        let forward = self.forward();
        crate::math::repeat(forward.x.atan2(forward.z).to_degrees(), 360.0)
    }
}

/// Rotation of `yaw` degrees about +Y
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw.to_radians())
}
