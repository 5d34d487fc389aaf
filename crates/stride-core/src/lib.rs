//! Stride Core - Core types and utilities shared by the stride crates
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Angle helpers with degree semantics (wrapping, critically damped smoothing)
//! - Transform component for character positioning
//! - Fixed-step game time

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use math::{delta_angle, move_towards, repeat, smooth_damp_angle};
pub use time::{GameTime, TimeConfig};
pub use types::Transform;
