//! Stride Game - Player locomotion and input
//!
//! Provides the input mapping and the third-person locomotion controller.

pub mod input;
pub mod player;

pub use input::{InputAction, InputBindings, InputHandler, InputSample, InputState};
pub use player::{
    AnimationDrive, AnimationParams, AnimationState, AnimatorParameters, AnimatorSink,
    CharacterMotor, FootstepHandler, GravityModel, Locomotion, LocomotionError, LocomotionState,
    MotionCommand, MovementConfig, MovementIntent, PlayerController, PlayerControllerBuilder,
    SpeedModel,
};
