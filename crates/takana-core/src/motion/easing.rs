//! Pure easing functions for scroll-linked and time-based animations
//!
//! Every curve maps progress in [0, 1] to an eased value with `f(0) = 0` and
//! `f(1) = 1`. Only `BackOut` leaves [0, 1] on the way (it overshoots the end
//! value before settling).

use serde::{Deserialize, Serialize};

/// Easing curve applied to one keyframe segment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Holds the start value until the segment ends
    Step,
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic ease-out: 1 - (1-t)²
    Power1Out,
    /// Cubic ease-in: t³ (accelerating, used for exits)
    Power2In,
    /// Cubic ease-out: 1 - (1-t)³ (decelerating, used for snapping)
    Power2Out,
    /// Quartic ease-out: 1 - (1-t)⁴
    Power3Out,
    /// Exponential ease-out: 1 - 2^(-10t)
    ExpoOut,
    /// Overshooting ease-out with the given overshoot amount
    BackOut(f64),
}

impl Ease {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value, in [0, 1] for every curve except `BackOut`
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Step => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Ease::Linear => t,
            Ease::Power1Out => power_out(t, 2),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => power_out(t, 3),
            Ease::Power3Out => power_out(t, 4),
            Ease::ExpoOut => exponential_ease_out(t),
            Ease::BackOut(overshoot) => back_ease_out(t, *overshoot),
        }
    }

    /// Whether the curve can leave [0, 1]
    pub fn overshoots(&self) -> bool {
        matches!(self, Ease::BackOut(s) if *s > 0.0)
    }
}

/// f(t) = 1 - (1-t)^n
#[inline]
fn power_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// Back ease-out: f(t) = 1 + (s+1)(t-1)³ + s(t-1)²
#[inline]
fn back_ease_out(t: f64, s: f64) -> f64 {
    let u = t - 1.0;
    1.0 + (s + 1.0) * u * u * u + s * u * u
}
