//! Critically damped smoothing for every animated camera quantity.
//!
//! The integrator is a spring-like "smooth damp": each call moves `current`
//! toward `target` by an amount derived from a persistent velocity, a smoothing
//! time, and the frame delta. It never overshoots: when a step would carry the
//! value past the target it lands exactly on the target instead.

use glam::DVec3;

/// Tolerance used to decide that a value has reached its target and can be
/// snapped exactly.
pub const EPSILON: f64 = 1e-5;

/// Lower bound applied to every smoothing time to keep `omega` finite.
const MIN_SMOOTH_TIME: f64 = 1e-4;

/// `true` when `value` is within `tolerance` of zero.
#[inline]
#[must_use]
pub fn approx_zero(value: f64, tolerance: f64) -> bool {
    value.abs() < tolerance
}

/// `true` when `a` and `b` are within `tolerance` of each other.
#[inline]
#[must_use]
pub fn approx_equals(a: f64, b: f64, tolerance: f64) -> bool {
    approx_zero(a - b, tolerance)
}

/// `true` when every component of `v` is within `tolerance` of zero.
#[inline]
#[must_use]
pub fn approx_zero_vec3(v: DVec3, tolerance: f64) -> bool {
    approx_zero(v.x, tolerance)
        && approx_zero(v.y, tolerance)
        && approx_zero(v.z, tolerance)
}

/// Round `value` to the nearest multiple of `step`.
#[inline]
#[must_use]
pub fn round_to_step(value: f64, step: f64) -> f64 {
    // Ties round toward +inf.
    (value / step + 0.5).floor() * step
}

/// Polynomial approximation of `exp(-x)` shared by both integrators.
#[inline]
fn decay(omega: f64, delta_time: f64) -> f64 {
    let x = omega * delta_time;
    1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x)
}

/// Largest lag allowed behind the target. A negative or NaN `max_speed`
/// is treated as unbounded.
fn lag_limit(max_speed: f64, smooth_time: f64) -> f64 {
    let limit = max_speed * smooth_time;
    if limit >= 0.0 {
        limit
    } else {
        f64::INFINITY
    }
}

/// Advance a scalar toward `target`.
///
/// `velocity` is the caller-owned accumulator carried between frames.
/// `max_speed` bounds how far the value may lag behind per unit of
/// smoothing time; pass `f64::INFINITY` for no bound. Negative or NaN
/// values are read as no bound.
///
/// A non-positive `delta_time` leaves both the value and velocity untouched.
#[must_use]
pub fn smooth_damp(
    current: f64,
    target: f64,
    velocity: &mut f64,
    smooth_time: f64,
    max_speed: f64,
    delta_time: f64,
) -> f64 {
    if delta_time <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let exp = decay(omega, delta_time);

    let original_to = target;
    let max_change = lag_limit(max_speed, smooth_time);
    let change = (current - target).clamp(-max_change, max_change);
    let target = current - change;

    let temp = (*velocity + omega * change) * delta_time;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot: the step crossed `original_to`.
    if (original_to - current > 0.0) == (output > original_to) {
        output = original_to;
        *velocity = (output - original_to) / delta_time;
    }

    output
}

/// Advance a vector toward `target`.
///
/// Same integrator as [`smooth_damp`], but `max_speed` clamps the combined
/// magnitude of the change, and overshoot is detected with the dot product
/// of the remaining distance and the motion past the target.
#[must_use]
pub fn smooth_damp_vec3(
    current: DVec3,
    target: DVec3,
    velocity: &mut DVec3,
    smooth_time: f64,
    max_speed: f64,
    delta_time: f64,
) -> DVec3 {
    if delta_time <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let exp = decay(omega, delta_time);

    let original_to = target;
    let max_change = lag_limit(max_speed, smooth_time);
    let mut change = current - target;
    let magnitude_sq = change.length_squared();
    if magnitude_sq > max_change * max_change {
        let magnitude = magnitude_sq.sqrt();
        change = change / magnitude * max_change;
    }
    let target = current - change;

    let temp = (*velocity + change * omega) * delta_time;
    *velocity = (*velocity - temp * omega) * exp;
    let mut output = target + (change + temp) * exp;

    let remaining = original_to - current;
    let past_target = output - original_to;
    if remaining.dot(past_target) > 0.0 {
        output = original_to;
        *velocity = (output - original_to) / delta_time;
    }

    output
}
