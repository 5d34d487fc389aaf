//! Per-step locomotion: facing, horizontal speed, gravity, and dodge timing
//!
//! [`Locomotion`] is pure state plus math. It never talks to physics or the
//! animator; [`PlayerController`](super::PlayerController) feeds it the
//! grounded flag and forwards its output.

use glam::{Quat, Vec3};
use stride_core::math::{move_towards, repeat, smooth_damp_angle};
use stride_core::types::yaw_rotation;
use tracing::{debug, info};

use crate::input::InputSample;

use super::animation::{step_blend, AnimationParams, AnimationSignals, AnimationState};
use super::movement::{GravityModel, MovementConfig, SpeedModel, DEAD_ZONE, DODGE_WINDOW};
use super::LocomotionError;

/// Slack on deadline checks so a window summed from f32 steps ends on time
const DEADLINE_EPSILON: f64 = 1e-6;

/// Mutable per-character locomotion state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocomotionState {
    /// Facing yaw in degrees, wrapped to [0, 360)
    pub facing: f32,
    /// Angular smoothing accumulator in degrees per second
    pub turn_velocity: f32,
    /// Vertical velocity (see [`GravityModel`] for units)
    pub vertical_velocity: f32,
    /// Ground contact as last reported by the motor
    pub grounded: bool,
    /// Current horizontal speed
    pub speed: f32,
    /// Blend-tree scalar in [0, 1]
    pub anim_velocity: f32,
    /// Current discrete animation state
    pub animation: AnimationState,
    /// Simulated seconds seen by this character
    pub clock: f64,
    /// Clock value at which the active dodge ends
    pub dodge_until: Option<f64>,
}

impl LocomotionState {
    pub fn is_dodging(&self) -> bool {
        self.dodge_until.is_some()
    }
}

/// Desired ground-plane movement for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// Normalised input direction in character input space (x right, z forward)
    pub direction: Vec3,
    /// World yaw the character wants to face, in degrees
    pub target_angle: f32,
    /// Raw input magnitude before normalisation
    pub magnitude: f32,
}

impl MovementIntent {
    pub fn from_input(input: &InputSample, camera_yaw: f32) -> Self {
        let raw = Vec3::new(input.horizontal, 0.0, input.vertical);
        let direction = raw.normalize_or_zero();
        Self {
            direction,
            target_angle: direction.x.atan2(direction.z).to_degrees() + camera_yaw,
            magnitude: raw.length(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.magnitude >= DEAD_ZONE
    }
}

/// Result of a horizontal step, to be handed to the motor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    /// Horizontal displacement for this step
    pub displacement: Vec3,
    /// Facing yaw in degrees after this step
    pub facing: f32,
    /// Facing as a rotation about +Y
    pub rotation: Quat,
    /// Speed used for this step
    pub speed: f32,
}

/// Locomotion core for one character
#[derive(Debug, Clone)]
pub struct Locomotion {
    config: MovementConfig,
    state: LocomotionState,
}

impl Locomotion {
    /// Create a character at rest facing +Z
    pub fn new(config: MovementConfig) -> Result<Self, LocomotionError> {
        config.validate()?;
        Ok(Self {
            config,
            state: LocomotionState::default(),
        })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Snap facing without smoothing (spawn, teleport)
    pub fn set_facing(&mut self, yaw: f32) {
        self.state.facing = repeat(yaw, 360.0);
        self.state.turn_velocity = 0.0;
    }

    /// Horizontal step: facing, speed, and displacement.
    ///
    /// Input below the dead zone yields no displacement and leaves facing
    /// alone. Axes are not clamped.
    pub fn tick(&mut self, input: &InputSample, camera_yaw: f32, dt: f32) -> MotionCommand {
        let intent = MovementIntent::from_input(input, camera_yaw);
        let moving = intent.is_moving();
        let dodging = self.state.is_dodging();

        let target_speed = self.config.select_speed(dodging, input.sprint, moving);
        self.state.speed = self.advance_speed(target_speed, moving, dodging, dt);
        self.state.anim_velocity = step_blend(self.state.anim_velocity, moving, &self.config, dt);

        let displacement = if moving {
            let facing = smooth_damp_angle(
                self.state.facing,
                intent.target_angle,
                &mut self.state.turn_velocity,
                self.config.turn_smooth_time,
                dt,
            );
            self.state.facing = repeat(facing, 360.0);
            yaw_rotation(self.state.facing) * Vec3::Z * (self.state.speed * dt)
        } else {
            Vec3::ZERO
        };

        self.state.clock += dt as f64;
        self.expire_dodge();
        self.refresh_animation(moving, input.sprint);

        MotionCommand {
            displacement,
            facing: self.state.facing,
            rotation: yaw_rotation(self.state.facing),
            speed: self.state.speed,
        }
    }

    fn advance_speed(&self, target: f32, moving: bool, dodging: bool, dt: f32) -> f32 {
        match self.config.speed_model {
            SpeedModel::Tiered => target,
            // Dodges start at full speed
            SpeedModel::Ramp if moving && dodging => target,
            SpeedModel::Ramp => {
                let current = self.state.speed;
                let rate = if moving && current < target {
                    self.config.acceleration
                } else {
                    self.config.deceleration
                };
                move_towards(current, target, rate * dt).max(0.0)
            }
        }
    }

    /// Record ground contact reported by the motor.
    ///
    /// Landing discards any downward velocity before the next integration.
    /// Leaving the ground discards the grounded snap, so a fall starts from
    /// rest.
    pub fn update_grounded(&mut self, grounded: bool) {
        if grounded != self.state.grounded {
            debug!(grounded, "Ground contact changed");
        }
        let left_ground = self.state.grounded && !grounded;
        self.state.grounded = grounded;
        if (grounded || left_ground) && self.state.vertical_velocity < 0.0 {
            self.state.vertical_velocity = 0.0;
        }
    }

    /// Vertical step. Returns the displacement to submit to the motor.
    ///
    /// While grounded the velocity is reset to `gravity * dt` every step so
    /// the motor keeps detecting the floor.
    pub fn integrate_vertical(&mut self, dt: f32) -> Vec3 {
        let gravity = self.config.gravity;

        let displacement = if self.state.grounded {
            self.state.vertical_velocity = gravity * dt;
            self.state.vertical_velocity
        } else {
            match self.config.gravity_model {
                GravityModel::Legacy => {
                    self.state.vertical_velocity += gravity * dt * dt;
                    self.state.vertical_velocity
                }
                GravityModel::Euler => {
                    self.state.vertical_velocity += gravity * dt;
                    self.state.vertical_velocity * dt
                }
            }
        };

        Vec3::new(0.0, displacement, 0.0)
    }

    /// Start a dodge if grounded and not already dodging.
    ///
    /// Returns false, with no state change, when the request is rejected.
    pub fn trigger_dodge(&mut self) -> bool {
        if !self.state.grounded || self.state.is_dodging() {
            debug!(
                grounded = self.state.grounded,
                dodging = self.state.is_dodging(),
                "Dodge rejected"
            );
            return false;
        }

        self.state.dodge_until = Some(self.state.clock + DODGE_WINDOW as f64);
        self.set_animation(AnimationState::Dodging);
        info!(clock = self.state.clock, "Dodge triggered");
        true
    }

    /// Parameters for the configured animation drive
    pub fn animation_params(&self) -> AnimationParams {
        AnimationParams::new(
            self.config.animation_drive,
            self.state.animation,
            self.state.anim_velocity,
        )
    }

    fn expire_dodge(&mut self) {
        if let Some(until) = self.state.dodge_until {
            if self.state.clock + DEADLINE_EPSILON >= until {
                self.state.dodge_until = None;
                debug!(clock = self.state.clock, "Dodge window elapsed");
            }
        }
    }

    fn refresh_animation(&mut self, moving: bool, sprinting: bool) {
        let next = AnimationState::resolve(AnimationSignals {
            moving,
            sprinting,
            grounded: self.state.grounded,
            dodging: self.state.is_dodging(),
        });
        self.set_animation(next);
    }

    fn set_animation(&mut self, next: AnimationState) {
        if next != self.state.animation {
            debug!(from = ?self.state.animation, to = ?next, "Animation state changed");
            self.state.animation = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::movement::AnimationDrive;

    const DT: f32 = 1.0 / 60.0;

    fn locomotion(config: MovementConfig) -> Locomotion {
        Locomotion::new(config).unwrap()
    }

    fn grounded(config: MovementConfig) -> Locomotion {
        let mut loco = locomotion(config);
        loco.update_grounded(true);
        loco
    }

    #[test]
    fn test_dead_zone_leaves_character_still() {
        let inputs = [
            InputSample::axes(0.0, 0.0),
            InputSample::axes(0.05, 0.0),
            InputSample::axes(0.05, -0.05),
            InputSample::axes(0.0, 0.099).sprinting(),
        ];
        for yaw in [0.0, 45.0, -720.0, 1234.5] {
            for input in inputs {
                let mut loco = grounded(MovementConfig::default());
                loco.set_facing(30.0);
                let cmd = loco.tick(&input, yaw, DT);
                assert_eq!(cmd.displacement, Vec3::ZERO);
                assert_eq!(cmd.facing, 30.0);
                assert_eq!(loco.state().facing, 30.0);
                assert_eq!(loco.state().turn_velocity, 0.0);
                assert_eq!(loco.state().animation, AnimationState::Idle);
            }
        }
    }

    #[test]
    fn test_grounded_vertical_is_not_accumulated() {
        let mut loco = grounded(MovementConfig::default());
        let gravity = loco.config().gravity;
        let first = loco.integrate_vertical(DT);
        let second = loco.integrate_vertical(DT);
        assert_eq!(first.y, gravity * DT);
        assert_eq!(first, second);
        assert_eq!(first.x, 0.0);
        assert_eq!(first.z, 0.0);
    }

    #[test]
    fn test_airborne_velocity_uses_squared_dt() {
        for n in [1, 5, 50] {
            let mut loco = locomotion(MovementConfig::default());
            let gravity = loco.config().gravity;
            let mut expected = 0.0f32;
            for _ in 0..n {
                loco.integrate_vertical(DT);
                expected += gravity * DT * DT;
            }
            let velocity = loco.state().vertical_velocity;
            assert!((velocity - expected).abs() < 1e-6, "n = {n}");
            assert!((velocity - n as f32 * gravity * DT * DT).abs() < 1e-5, "n = {n}");
        }
    }

    #[test]
    fn test_ten_airborne_ticks_fall_slowly() {
        let mut loco = locomotion(MovementConfig {
            gravity: -9.81,
            ..Default::default()
        });
        let mut last = Vec3::ZERO;
        for _ in 0..10 {
            last = loco.integrate_vertical(DT);
        }
        let velocity = loco.state().vertical_velocity;
        assert!((velocity + 0.02725).abs() < 1e-5);
        assert_eq!(last.y, velocity);
        // A standard integrator would be near -1.635
        assert!(velocity > -0.1);
    }

    #[test]
    fn test_euler_gravity() {
        let mut loco = locomotion(MovementConfig {
            gravity_model: GravityModel::Euler,
            ..Default::default()
        });
        let gravity = loco.config().gravity;
        let mut last = Vec3::ZERO;
        for _ in 0..10 {
            last = loco.integrate_vertical(DT);
        }
        let velocity = loco.state().vertical_velocity;
        assert!((velocity - 10.0 * gravity * DT).abs() < 1e-4);
        assert!((last.y - velocity * DT).abs() < 1e-6);
    }

    #[test]
    fn test_landing_clamps_velocity_before_integration() {
        let mut loco = locomotion(MovementConfig::default());
        for _ in 0..10 {
            loco.integrate_vertical(DT);
        }
        assert!(loco.state().vertical_velocity < 0.0);

        loco.update_grounded(true);
        assert_eq!(loco.state().vertical_velocity, 0.0);

        let step = loco.integrate_vertical(DT);
        assert_eq!(step.y, loco.config().gravity * DT);
    }

    #[test]
    fn test_walking_off_ledge_falls_from_rest() {
        for gravity_model in [GravityModel::Legacy, GravityModel::Euler] {
            let mut loco = grounded(MovementConfig {
                gravity_model,
                ..Default::default()
            });
            let gravity = loco.config().gravity;
            let snap = loco.integrate_vertical(DT);
            assert_eq!(snap.y, gravity * DT);

            loco.update_grounded(false);
            assert_eq!(loco.state().vertical_velocity, 0.0);

            let mut fallen = 0.0;
            for _ in 0..10 {
                fallen += loco.integrate_vertical(DT).y;
            }
            // Both models fall sum(1..=10) * g * dt^2 from rest
            let from_rest = gravity * DT * DT * 55.0;
            assert!((fallen - from_rest).abs() < 1e-4, "{gravity_model:?}: {fallen}");
        }
    }

    #[test]
    fn test_staying_airborne_keeps_fall_velocity() {
        let mut loco = locomotion(MovementConfig::default());
        for _ in 0..5 {
            loco.integrate_vertical(DT);
        }
        let falling = loco.state().vertical_velocity;
        loco.update_grounded(false);
        assert_eq!(loco.state().vertical_velocity, falling);
    }

    #[test]
    fn test_landing_keeps_upward_velocity() {
        let mut loco = locomotion(MovementConfig {
            gravity: 2.0,
            ..Default::default()
        });
        loco.integrate_vertical(DT);
        let rising = loco.state().vertical_velocity;
        assert!(rising > 0.0);
        loco.update_grounded(true);
        assert_eq!(loco.state().vertical_velocity, rising);
    }

    #[test]
    fn test_dodge_preconditions() {
        let mut loco = locomotion(MovementConfig::default());
        let before = loco.state().clone();
        assert!(!loco.trigger_dodge());
        assert_eq!(loco.state(), &before);

        loco.update_grounded(true);
        assert!(loco.trigger_dodge());
        assert_eq!(loco.state().animation, AnimationState::Dodging);

        let before = loco.state().clone();
        assert!(!loco.trigger_dodge());
        assert_eq!(loco.state(), &before);
    }

    #[test]
    fn test_dodge_overrides_sprint_then_expires() {
        let config = MovementConfig::default();
        let mut loco = grounded(config.clone());
        assert!(loco.trigger_dodge());

        let input = InputSample::axes(0.0, 1.0).sprinting();
        for step in 0..4 {
            let cmd = loco.tick(&input, 0.0, 0.25);
            assert_eq!(cmd.speed, config.dodge_speed, "step {step}");
            assert!((cmd.displacement.length() - config.dodge_speed * 0.25).abs() < 1e-4);
            if step < 3 {
                assert!(loco.state().is_dodging());
                assert_eq!(loco.state().animation, AnimationState::Dodging);
            }
        }

        // One second has elapsed: the dodge clears with no extra call
        assert!(!loco.state().is_dodging());
        assert_eq!(loco.state().animation, AnimationState::Running);

        let cmd = loco.tick(&input, 0.0, 0.25);
        assert_eq!(cmd.speed, config.run_speed);
    }

    #[test]
    fn test_dodge_window_is_one_second_at_common_rates() {
        let config = MovementConfig::default();
        let forward = InputSample::axes(0.0, 1.0);
        for (dt, ticks) in [(0.02, 50), (0.01, 100), (1.0 / 60.0, 60), (0.1, 10), (0.25, 4)] {
            let mut loco = grounded(config.clone());
            assert!(loco.trigger_dodge());

            let dodge_ticks = (0..ticks * 2)
                .map(|_| loco.tick(&forward, 0.0, dt))
                .filter(|cmd| cmd.speed == config.dodge_speed)
                .count();
            assert_eq!(dodge_ticks, ticks, "dt = {dt}");
            assert!(!loco.state().is_dodging());
        }
    }

    #[test]
    fn test_dodge_expiry_falls_back_to_idle_without_input() {
        let mut loco = grounded(MovementConfig::default());
        assert!(loco.trigger_dodge());
        let idle = InputSample::default();
        loco.tick(&idle, 0.0, 0.5);
        assert_eq!(loco.state().animation, AnimationState::Dodging);
        loco.tick(&idle, 0.0, 0.5);
        assert_eq!(loco.state().animation, AnimationState::Idle);
        assert!(loco.trigger_dodge());
    }

    #[test]
    fn test_speed_tier_table() {
        let config = MovementConfig::default();
        for bits in 0..16u8 {
            let on_ground = bits & 1 != 0;
            let dodging = bits & 2 != 0;
            let sprint = bits & 4 != 0;
            let moving = bits & 8 != 0;

            let mut loco = locomotion(config.clone());
            if dodging {
                loco.update_grounded(true);
                assert!(loco.trigger_dodge());
            }
            loco.update_grounded(on_ground);

            let mut input = if moving {
                InputSample::axes(0.0, 1.0)
            } else {
                InputSample::default()
            };
            input.sprint = sprint;

            let expected = match (moving, dodging, sprint) {
                (false, _, _) => 0.0,
                (true, true, _) => config.dodge_speed,
                (true, false, true) => config.run_speed,
                (true, false, false) => config.walk_speed,
            };
            let cmd = loco.tick(&input, 0.0, 0.1);
            assert_eq!(
                cmd.speed, expected,
                "grounded={on_ground} dodging={dodging} sprint={sprint} moving={moving}"
            );
        }
    }

    #[test]
    fn test_turning_right_moves_along_positive_x() {
        let mut loco = grounded(MovementConfig {
            walk_speed: 1.0,
            turn_smooth_time: 0.1,
            ..Default::default()
        });
        let cmd = loco.tick(&InputSample::axes(1.0, 0.0), 0.0, 0.1);

        assert!(cmd.displacement.x > 0.0);
        assert!(cmd.displacement.length() <= 0.1 + 1e-6);
        // Only partly turned towards 90 degrees after one step
        assert!(cmd.facing > 0.0 && cmd.facing < 90.0);
        assert!(cmd.displacement.z > 0.0);

        let mut last = cmd;
        for _ in 0..50 {
            last = loco.tick(&InputSample::axes(1.0, 0.0), 0.0, 0.1);
        }
        assert!((last.facing - 90.0).abs() < 0.01);
        assert!((last.displacement.x - 0.1).abs() < 1e-4);
        assert!(last.displacement.z.abs() < 1e-4);
    }

    #[test]
    fn test_camera_yaw_offsets_target() {
        let mut loco = grounded(MovementConfig::default());
        let mut cmd = loco.tick(&InputSample::axes(0.0, 1.0), 90.0, DT);
        for _ in 0..300 {
            cmd = loco.tick(&InputSample::axes(0.0, 1.0), 90.0, DT);
        }
        assert!((cmd.facing - 90.0).abs() < 0.01);
        assert!(cmd.displacement.x > 0.0);
        assert!(cmd.displacement.z.abs() < 1e-4);
    }

    #[test]
    fn test_turn_velocity_persists_between_ticks() {
        let mut loco = grounded(MovementConfig::default());
        loco.tick(&InputSample::axes(1.0, 0.0), 0.0, DT);
        let velocity = loco.state().turn_velocity;
        assert!(velocity > 0.0);

        // Stationary step keeps the accumulator
        loco.tick(&InputSample::default(), 0.0, DT);
        assert_eq!(loco.state().turn_velocity, velocity);
    }

    #[test]
    fn test_out_of_range_input_is_tolerated() {
        let config = MovementConfig::default();
        let mut loco = grounded(config.clone());
        let cmd = loco.tick(&InputSample::axes(0.0, 5.0), 0.0, 0.1);
        assert!((cmd.displacement.length() - config.walk_speed * 0.1).abs() < 1e-5);
        assert!(cmd.displacement.z > 0.0);
    }

    #[test]
    fn test_airborne_character_moves_but_animates_idle() {
        let mut loco = locomotion(MovementConfig::default());
        let cmd = loco.tick(&InputSample::axes(0.0, 1.0), 0.0, DT);
        assert!(cmd.displacement.length() > 0.0);
        assert_eq!(loco.state().animation, AnimationState::Idle);
    }

    #[test]
    fn test_walk_run_toggle() {
        let mut loco = grounded(MovementConfig::default());
        loco.tick(&InputSample::axes(0.0, 1.0), 0.0, DT);
        assert_eq!(loco.state().animation, AnimationState::Walking);
        loco.tick(&InputSample::axes(0.0, 1.0).sprinting(), 0.0, DT);
        assert_eq!(loco.state().animation, AnimationState::Running);
        loco.tick(&InputSample::axes(0.0, 1.0), 0.0, DT);
        assert_eq!(loco.state().animation, AnimationState::Walking);
        loco.update_grounded(false);
        loco.tick(&InputSample::axes(0.0, 1.0), 0.0, DT);
        assert_eq!(loco.state().animation, AnimationState::Idle);
    }

    #[test]
    fn test_ramp_speed_builds_and_decays() {
        let mut loco = grounded(MovementConfig {
            speed_model: SpeedModel::Ramp,
            walk_speed: 2.0,
            acceleration: 6.0,
            deceleration: 10.0,
            ..Default::default()
        });
        let forward = InputSample::axes(0.0, 1.0);
        let speeds: Vec<f32> = (0..4).map(|_| loco.tick(&forward, 0.0, 0.1).speed).collect();
        assert!((speeds[0] - 0.6).abs() < 1e-5);
        assert!((speeds[1] - 1.2).abs() < 1e-5);
        assert!((speeds[2] - 1.8).abs() < 1e-5);
        assert_eq!(speeds[3], 2.0);

        let cmd = loco.tick(&InputSample::default(), 0.0, 0.1);
        assert_eq!(cmd.displacement, Vec3::ZERO);
        assert!((cmd.speed - 1.0).abs() < 1e-5);
        let cmd = loco.tick(&InputSample::default(), 0.0, 0.1);
        assert_eq!(cmd.speed, 0.0);
    }

    #[test]
    fn test_ramp_sprint_release_settles_on_walk() {
        let config = MovementConfig {
            speed_model: SpeedModel::Ramp,
            ..Default::default()
        };
        let mut loco = grounded(config.clone());
        let sprint = InputSample::axes(0.0, 1.0).sprinting();
        for _ in 0..20 {
            loco.tick(&sprint, 0.0, 0.1);
        }
        assert_eq!(loco.state().speed, config.run_speed);

        let cmd = loco.tick(&InputSample::axes(0.0, 1.0), 0.0, 0.1);
        assert!((cmd.speed - (config.run_speed - config.deceleration * 0.1)).abs() < 1e-5);
        for _ in 0..10 {
            loco.tick(&InputSample::axes(0.0, 1.0), 0.0, 0.1);
        }
        assert_eq!(loco.state().speed, config.walk_speed);
    }

    #[test]
    fn test_ramp_dodge_is_immediate() {
        let config = MovementConfig {
            speed_model: SpeedModel::Ramp,
            ..Default::default()
        };
        let mut loco = grounded(config.clone());
        assert!(loco.trigger_dodge());
        let cmd = loco.tick(&InputSample::axes(0.0, 1.0), 0.0, 0.1);
        assert_eq!(cmd.speed, config.dodge_speed);
    }

    #[test]
    fn test_animation_params_follow_drive() {
        let mut loco = grounded(MovementConfig {
            animation_drive: AnimationDrive::Blend,
            ..Default::default()
        });
        loco.tick(&InputSample::axes(0.0, 1.0), 0.0, 0.5);
        match loco.animation_params() {
            AnimationParams::Blend(value) => assert!((value - 0.2).abs() < 1e-6),
            other => panic!("unexpected params: {other:?}"),
        }

        let mut loco = grounded(MovementConfig::default());
        loco.tick(&InputSample::axes(0.0, 1.0), 0.0, 0.5);
        assert_eq!(
            loco.animation_params(),
            AnimationParams::Discrete(AnimationState::Walking)
        );
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let result = Locomotion::new(MovementConfig {
            turn_smooth_time: f32::INFINITY,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(LocomotionError::InvalidConfig {
                field: "turn_smooth_time",
                ..
            })
        ));
    }
}
