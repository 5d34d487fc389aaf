//! Movement configuration and constants

use serde::{Deserialize, Serialize};

use super::LocomotionError;

/// Input magnitude below which the stick counts as released
pub const DEAD_ZONE: f32 = 0.1;

/// How long a dodge overrides speed selection, in simulated seconds
pub const DODGE_WINDOW: f32 = 1.0;

/// How horizontal speed reacts to input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedModel {
    /// Speed snaps to the tier target each step
    #[default]
    Tiered,
    /// Speed ramps up at `acceleration` and bleeds off at `deceleration`
    Ramp,
}

/// How vertical velocity accumulates while airborne
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityModel {
    /// `v += g * dt²`, and the velocity is used directly as the displacement.
    /// Falls far slower than real free fall.
    #[default]
    Legacy,
    /// `v += g * dt`, displacement `v * dt`
    Euler,
}

/// Which animator parameters are authoritative for a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationDrive {
    /// Four exclusive booleans: isIdle, isWalking, isRunning, isDodging
    #[default]
    Discrete,
    /// One blend-tree scalar ramped between 0 and 1
    Blend,
}

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// Sprinting speed in meters per second
    pub run_speed: f32,
    /// Speed during a dodge in meters per second
    pub dodge_speed: f32,
    /// Gravity along Y (negative is down)
    pub gravity: f32,
    /// Approximate time to turn and face the input direction, in seconds
    pub turn_smooth_time: f32,
    /// Jump apex height. Carried for tuning files; locomotion does not jump.
    pub jump_height: f32,
    /// Ramp model: speed gained per second while moving
    pub acceleration: f32,
    /// Ramp model: speed lost per second once input stops
    pub deceleration: f32,
    /// Blend drive: rate the blend scalar climbs while moving
    pub anim_acceleration: f32,
    /// Blend drive: rate the blend scalar falls while idle
    pub anim_deceleration: f32,
    pub speed_model: SpeedModel,
    pub gravity_model: GravityModel,
    pub animation_drive: AnimationDrive,
    /// Whether the application should capture the cursor when this character
    /// becomes active
    pub capture_cursor: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 5.0,
            dodge_speed: 8.0,
            gravity: -9.81,
            turn_smooth_time: 0.1,
            jump_height: 1.0,
            acceleration: 6.0,
            deceleration: 10.0,
            anim_acceleration: 0.1,
            anim_deceleration: 0.5,
            speed_model: SpeedModel::Tiered,
            gravity_model: GravityModel::Legacy,
            animation_drive: AnimationDrive::Discrete,
            capture_cursor: true,
        }
    }
}

impl MovementConfig {
    /// Target speed for the current tier.
    ///
    /// Grounded does not factor in; airborne characters keep their tier.
    pub fn select_speed(&self, dodging: bool, sprinting: bool, moving: bool) -> f32 {
        if !moving {
            0.0
        } else if dodging {
            self.dodge_speed
        } else if sprinting {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Reject values that would poison the per-step math
    pub fn validate(&self) -> Result<(), LocomotionError> {
        let fields = [
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("dodge_speed", self.dodge_speed),
            ("turn_smooth_time", self.turn_smooth_time),
            ("jump_height", self.jump_height),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("anim_acceleration", self.anim_acceleration),
            ("anim_deceleration", self.anim_deceleration),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(LocomotionError::invalid(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(LocomotionError::invalid(field, "must not be negative"));
            }
        }

        if !self.gravity.is_finite() {
            return Err(LocomotionError::invalid("gravity", "must be finite"));
        }

        Ok(())
    }
}
