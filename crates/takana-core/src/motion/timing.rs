//! Time and progress calculation utilities
//!
//! Pure functions; callers pass `now` explicitly so animations can be driven
//! by a real frame clock or by a test clock.

use std::time::{Duration, Instant};

/// Calculate animation progress (0.0 to 1.0) from start time and duration
///
/// # Arguments
/// * `start` - Animation start time
/// * `now` - Current frame time
/// * `duration` - Total animation duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Position of `value` inside `[start, end]`, clamped to [0, 1]
///
/// A degenerate band (`end <= start`) reads as complete once `value`
/// reaches `start`.
#[inline]
pub fn band_progress(value: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if value >= start { 1.0 } else { 0.0 };
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

/// Move `current` toward `target` with exponential smoothing
///
/// `lag` is the time constant: after `lag` has elapsed about 63% of the
/// remaining distance is covered. A zero lag jumps straight to `target`.
/// Values within `epsilon` of the target settle on it.
#[inline]
pub fn smooth_toward(current: f64, target: f64, dt: Duration, lag: Duration) -> f64 {
    const EPSILON: f64 = 1e-4;

    if lag.is_zero() {
        return target;
    }
    let k = 1.0 - (-dt.as_secs_f64() / lag.as_secs_f64()).exp();
    let next = lerp(current, target, k);
    if (target - next).abs() < EPSILON {
        target
    } else {
        next
    }
}
