//! Player controller: runs locomotion against a motor and an animator

use glam::Vec3;
use stride_core::Transform;
use stride_physics::{CharacterBody, PhysicsWorld};
use tracing::trace;

use crate::input::InputSample;

use super::animation::{AnimatorSink, FootstepHandler};
use super::locomotion::{Locomotion, MotionCommand};
use super::{LocomotionError, MovementConfig};

/// Collision-aware mover that owns ground detection
pub trait CharacterMotor {
    /// Whatever the motor needs borrowed per call (a physics world, or nothing)
    type Env;

    /// Move by `displacement`, resolving collisions
    fn move_by(&mut self, env: &mut Self::Env, displacement: Vec3, dt: f32);

    /// Ground contact after the last move
    fn is_grounded(&self) -> bool;

    /// Feet position
    fn position(&self) -> Vec3;
}

impl CharacterMotor for CharacterBody {
    type Env = PhysicsWorld;

    fn move_by(&mut self, env: &mut PhysicsWorld, displacement: Vec3, dt: f32) {
        CharacterBody::move_by(self, env, displacement, dt);
    }

    fn is_grounded(&self) -> bool {
        CharacterBody::is_grounded(self)
    }

    fn position(&self) -> Vec3 {
        CharacterBody::position(self)
    }
}

/// Player controller handling input, movement, and animation output
pub struct PlayerController<M, A> {
    locomotion: Locomotion,
    motor: M,
    animator: A,
    footsteps: Option<Box<dyn FootstepHandler>>,
}

impl<M: CharacterMotor, A: AnimatorSink> PlayerController<M, A> {
    pub fn builder() -> PlayerControllerBuilder<M, A> {
        PlayerControllerBuilder::new()
    }

    /// Run one fixed step.
    ///
    /// Horizontal and vertical displacement go to the motor as one sweep, so
    /// the grounded report always comes from a move with a downward part. The
    /// report is recorded after the move and gates the next step.
    pub fn fixed_update(
        &mut self,
        env: &mut M::Env,
        input: &InputSample,
        camera_yaw: f32,
        dt: f32,
    ) -> MotionCommand {
        if input.dodge {
            // Rejected dodges are dropped
            self.locomotion.trigger_dodge();
        }

        let command = self.locomotion.tick(input, camera_yaw, dt);
        let vertical = self.locomotion.integrate_vertical(dt);
        self.motor.move_by(env, command.displacement + vertical, dt);
        self.locomotion.update_grounded(self.motor.is_grounded());

        self.locomotion.animation_params().apply(&mut self.animator);

        trace!(
            position = ?self.motor.position(),
            facing = command.facing,
            speed = command.speed,
            grounded = self.locomotion.state().grounded,
            "Player step"
        );
        command
    }

    /// Forward a left-foot contact event from the animation system
    pub fn foot_left(&mut self) {
        if let Some(handler) = self.footsteps.as_mut() {
            handler.on_left_foot();
        }
    }

    /// Forward a right-foot contact event from the animation system
    pub fn foot_right(&mut self) {
        if let Some(handler) = self.footsteps.as_mut() {
            handler.on_right_foot();
        }
    }

    /// Start a dodge outside of the input sample
    pub fn trigger_dodge(&mut self) -> bool {
        self.locomotion.trigger_dodge()
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Feet position and facing
    pub fn transform(&self) -> Transform {
        Transform::from_position_yaw(self.motor.position(), self.locomotion.state().facing)
    }

    /// Whether the application should capture the cursor for this character
    pub fn wants_cursor_capture(&self) -> bool {
        self.locomotion.config().capture_cursor
    }
}

/// Assembles a [`PlayerController`], refusing to build with missing parts
pub struct PlayerControllerBuilder<M, A> {
    config: MovementConfig,
    facing: f32,
    motor: Option<M>,
    animator: Option<A>,
    footsteps: Option<Box<dyn FootstepHandler>>,
}

impl<M: CharacterMotor, A: AnimatorSink> PlayerControllerBuilder<M, A> {
    pub fn new() -> Self {
        Self {
            config: MovementConfig::default(),
            facing: 0.0,
            motor: None,
            animator: None,
            footsteps: None,
        }
    }

    pub fn config(mut self, config: MovementConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial facing yaw in degrees
    pub fn facing(mut self, yaw: f32) -> Self {
        self.facing = yaw;
        self
    }

    pub fn motor(mut self, motor: M) -> Self {
        self.motor = Some(motor);
        self
    }

    pub fn animator(mut self, animator: A) -> Self {
        self.animator = Some(animator);
        self
    }

    pub fn footsteps(mut self, handler: impl FootstepHandler + 'static) -> Self {
        self.footsteps = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<PlayerController<M, A>, LocomotionError> {
        let motor = self.motor.ok_or(LocomotionError::MissingMotor)?;
        let animator = self.animator.ok_or(LocomotionError::MissingAnimator)?;

        let mut locomotion = Locomotion::new(self.config)?;
        locomotion.set_facing(self.facing);
        locomotion.update_grounded(motor.is_grounded());

        Ok(PlayerController {
            locomotion,
            motor,
            animator,
            footsteps: self.footsteps,
        })
    }
}

impl<M: CharacterMotor, A: AnimatorSink> Default for PlayerControllerBuilder<M, A> {
    fn default() -> Self {
        Self::new()
    }
}
