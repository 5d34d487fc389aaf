//! Capsule character body using rapier3d's kinematic character controller
//!
//! The body does not integrate velocity. Callers request a displacement each
//! step and read back the grounded flag the sweep produced.

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use tracing::debug;

use crate::PhysicsWorld;

/// Capsule shape and sweep settings
#[derive(Debug, Clone)]
pub struct CapsuleConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.3m)
    pub radius: f32,
    /// Maximum walkable slope in degrees
    pub max_slope_angle: f32,
    /// Step height for climbing stairs
    pub step_height: f32,
    /// Gap kept between the capsule and geometry
    pub skin_width: f32,
    /// Keep the capsule glued to the ground when walking down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.3,
            max_slope_angle: 45.0,
            step_height: 0.3,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// Collision-aware capsule that moves by requested displacements
pub struct CharacterBody {
    /// Configuration
    pub config: CapsuleConfig,
    /// Feet position
    position: Vec3,
    /// Grounded flag reported by the last sweep
    grounded: bool,
    collider_handle: Option<ColliderHandle>,
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a body with the default capsule
    pub fn new() -> Self {
        Self::with_config(CapsuleConfig::default())
    }

    /// Create a body with a custom capsule
    pub fn with_config(config: CapsuleConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: false,
        });
        controller.snap_to_ground = config
            .snap_to_ground
            .then_some(CharacterLength::Absolute(config.ground_snap_distance));
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            grounded: false,
            collider_handle: None,
            controller,
        }
    }

    /// Insert the capsule collider with its feet at `position`
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;
        self.grounded = false;

        let half_height = (self.config.height - 2.0 * self.config.radius) / 2.0;
        let center = self.center_position();
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), self.config.radius)
            .translation(vector![center.x, center.y, center.z])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        debug!("Spawned character capsule at {:?}", position);
        handle
    }

    /// Sweep the capsule by `desired` and apply the corrected translation.
    ///
    /// Returns the translation actually applied. An unspawned body does not
    /// move.
    pub fn move_by(&mut self, physics: &mut PhysicsWorld, desired: Vec3, dt: f32) -> Vec3 {
        let Some(handle) = self.collider_handle else {
            return Vec3::ZERO;
        };
        let Some(collider) = physics.collider_set.get(handle) else {
            return Vec3::ZERO;
        };

        let center = self.center_position();
        let current_pos = Isometry::translation(center.x, center.y, center.z);

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            collider.shape(),
            &current_pos,
            vector![desired.x, desired.y, desired.z],
            QueryFilter::default().exclude_collider(handle),
            |_| {},
        );

        self.grounded = movement.grounded;

        let applied = Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.position += applied;
        self.sync_collider(physics);
        applied
    }

    /// Feet position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Middle of the capsule
    pub fn center_position(&self) -> Vec3 {
        self.position + Vec3::Y * (self.config.height / 2.0)
    }

    /// Grounded flag from the most recent sweep
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn sync_collider(&self, physics: &mut PhysicsWorld) {
        let Some(handle) = self.collider_handle else {
            return;
        };
        let center = self.center_position();
        if let Some(collider) = physics.collider_set.get_mut(handle) {
            collider.set_translation(vector![center.x, center.y, center.z]);
        }
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}
