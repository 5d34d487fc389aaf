//! Player controller module
//!
//! Third-person locomotion: camera-relative facing, speed tiers, dodging,
//! gravity, and animator output, driven through a collision-aware motor.

pub mod animation;
mod controller;
mod error;
mod locomotion;
mod movement;

pub use animation::{
    AnimationParams, AnimationSignals, AnimationState, AnimatorParameters, AnimatorSink,
    FootstepHandler,
};
pub use controller::{CharacterMotor, PlayerController, PlayerControllerBuilder};
pub use error::LocomotionError;
pub use locomotion::{Locomotion, LocomotionState, MotionCommand, MovementIntent};
pub use movement::{
    AnimationDrive, GravityModel, MovementConfig, SpeedModel, DEAD_ZONE, DODGE_WINDOW,
};
