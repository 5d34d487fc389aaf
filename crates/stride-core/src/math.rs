//! Scalar and angle helpers
//!
//! Angles in this module are in degrees. Facing angles grow clockwise when
//! viewed from above (+Y), so 0 faces +Z and 90 faces +X.

/// Smallest smoothing time accepted by [`smooth_damp`]
pub const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Loop `t` into the range `[0, length)`
pub fn repeat(t: f32, length: f32) -> f32 {
    let wrapped = (t - (t / length).floor() * length).max(0.0);
    // Tiny negative inputs round up to exactly `length`
    if wrapped >= length {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed difference from `current` to `target`, in (-180, 180]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Move a scalar towards a target by at most `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Critically damped spring towards `target`.
///
/// `velocity` is the persisted rate of change and must be carried between
/// calls by the owner. The output never overshoots `target`. A non-positive
/// `dt` returns `current` and leaves `velocity` untouched.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;

    // Padé-style approximation of exp(-x)
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }

    output
}

/// Critically damped angle smoothing that always turns the short way round.
///
/// The result is not wrapped; callers that store a facing angle should pass it
/// through [`repeat`] themselves.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}
