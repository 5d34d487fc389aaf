//! Animation state and animator parameter output
//!
//! Locomotion resolves one [`AnimationState`] per step. The configured
//! [`AnimationDrive`] decides whether it reaches the animator as four
//! exclusive booleans or as a single blend-tree scalar.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::movement::{AnimationDrive, MovementConfig};

pub const IS_IDLE: &str = "isIdle";
pub const IS_WALKING: &str = "isWalking";
pub const IS_RUNNING: &str = "isRunning";
pub const IS_DODGING: &str = "isDodging";
/// Blend-tree scalar parameter
pub const VELOCITY: &str = "Velocity";

/// Discrete locomotion animation state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Running,
    Dodging,
}

/// Facts a step knows about the character when picking an animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationSignals {
    pub moving: bool,
    pub sprinting: bool,
    pub grounded: bool,
    pub dodging: bool,
}

impl AnimationState {
    pub const ALL: [AnimationState; 4] = [
        AnimationState::Idle,
        AnimationState::Walking,
        AnimationState::Running,
        AnimationState::Dodging,
    ];

    /// The single state implied by `signals`.
    ///
    /// A dodge wins over everything; otherwise leaving the ground or letting go
    /// of the stick drops back to idle.
    pub fn resolve(signals: AnimationSignals) -> Self {
        if signals.dodging {
            AnimationState::Dodging
        } else if !signals.grounded || !signals.moving {
            AnimationState::Idle
        } else if signals.sprinting {
            AnimationState::Running
        } else {
            AnimationState::Walking
        }
    }

    /// Animator boolean that mirrors this state
    pub fn parameter(self) -> &'static str {
        match self {
            AnimationState::Idle => IS_IDLE,
            AnimationState::Walking => IS_WALKING,
            AnimationState::Running => IS_RUNNING,
            AnimationState::Dodging => IS_DODGING,
        }
    }
}

/// Advance the blend-tree scalar by one step
pub fn step_blend(value: f32, moving: bool, config: &MovementConfig, dt: f32) -> f32 {
    if moving {
        if value < 1.0 {
            (value + config.anim_acceleration * dt * 4.0).min(1.0)
        } else {
            value
        }
    } else if value > f32::EPSILON {
        (value - config.anim_deceleration * dt * 3.0).max(0.0)
    } else {
        0.0
    }
}

/// What a step writes to the animator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationParams {
    Discrete(AnimationState),
    Blend(f32),
}

impl AnimationParams {
    pub fn new(drive: AnimationDrive, state: AnimationState, blend: f32) -> Self {
        match drive {
            AnimationDrive::Discrete => AnimationParams::Discrete(state),
            AnimationDrive::Blend => AnimationParams::Blend(blend),
        }
    }

    /// Write every parameter of the active drive to `sink`
    pub fn apply<S: AnimatorSink + ?Sized>(&self, sink: &mut S) {
        match *self {
            AnimationParams::Discrete(current) => {
                for state in AnimationState::ALL {
                    sink.set_bool(state.parameter(), state == current);
                }
            }
            AnimationParams::Blend(value) => sink.set_float(VELOCITY, value),
        }
    }
}

/// Receiver for animator parameters, usually an animation graph
pub trait AnimatorSink {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_float(&mut self, name: &str, value: f32);
}

impl<S: AnimatorSink + ?Sized> AnimatorSink for &mut S {
    fn set_bool(&mut self, name: &str, value: bool) {
        (**self).set_bool(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        (**self).set_float(name, value);
    }
}

impl<S: AnimatorSink + ?Sized> AnimatorSink for Box<S> {
    fn set_bool(&mut self, name: &str, value: bool) {
        (**self).set_bool(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        (**self).set_float(name, value);
    }
}

/// Parameter table for headless runs
#[derive(Debug, Clone, Default)]
pub struct AnimatorParameters {
    bools: HashMap<String, bool>,
    floats: HashMap<String, f32>,
    /// Total writes received
    pub writes: u64,
}

impl AnimatorParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// The discrete state currently flagged, if exactly one flag is set
    pub fn active_state(&self) -> Option<AnimationState> {
        let mut active = AnimationState::ALL
            .into_iter()
            .filter(|state| self.get_bool(state.parameter()).unwrap_or(false));
        let first = active.next()?;
        active.next().is_none().then_some(first)
    }
}

impl AnimatorSink for AnimatorParameters {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_owned(), value);
        self.writes += 1;
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.insert(name.to_owned(), value);
        self.writes += 1;
    }
}

/// Hooks fired by foot-contact events in walk and run clips
pub trait FootstepHandler {
    fn on_left_foot(&mut self) {}
    fn on_right_foot(&mut self) {}
}
