//! Viewport geometry and visual states
//!
//! Declared states use viewport-relative units (`vw`/`vh`) the way the page
//! is authored; they are resolved against the live viewport into a
//! [`Transform`] of plain numbers before being written to an element.

use serde::{Deserialize, Serialize};

use crate::motion::lerp;

/// Visible area. Units are whatever the host measures in (CSS pixels,
/// terminal cells).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// `value` percent of the viewport width
    #[inline]
    pub fn vw(&self, value: f64) -> f64 {
        self.width * value / 100.0
    }

    /// `value` percent of the viewport height
    #[inline]
    pub fn vh(&self, value: f64) -> f64 {
        self.height * value / 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A length in absolute or viewport-relative units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Vw(f64),
    Vh(f64),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    pub fn resolve(&self, viewport: &Viewport) -> f64 {
        match *self {
            Length::Px(v) => v,
            Length::Vw(v) => viewport.vw(v),
            Length::Vh(v) => viewport.vh(v),
        }
    }
}

/// A declared visual state: translation, scale, rotation and opacity
///
/// Properties not mentioned when building a state keep their resting value,
/// so `VisualState::resting().x(Length::Vw(-18.0)).opacity(0.0)` leaves
/// scale and rotation untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub x: Length,
    pub y: Length,
    pub scale: f64,
    /// Rotation in degrees
    pub rotate: f64,
    pub opacity: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::RESTING
    }
}

impl VisualState {
    pub const RESTING: VisualState = VisualState {
        x: Length::ZERO,
        y: Length::ZERO,
        scale: 1.0,
        rotate: 0.0,
        opacity: 1.0,
    };

    pub fn resting() -> Self {
        Self::RESTING
    }

    /// Fully transparent, otherwise resting
    pub fn hidden() -> Self {
        Self::RESTING.opacity(0.0)
    }

    pub fn x(mut self, x: Length) -> Self {
        self.x = x;
        self
    }

    pub fn y(mut self, y: Length) -> Self {
        self.y = y;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn resolve(&self, viewport: &Viewport) -> Transform {
        Transform {
            x: self.x.resolve(viewport),
            y: self.y.resolve(viewport),
            scale: self.scale,
            rotate: self.rotate,
            opacity: self.opacity,
        }
    }

    pub(crate) fn is_finite(&self, viewport: &Viewport) -> bool {
        let t = self.resolve(viewport);
        [t.x, t.y, t.scale, t.rotate, t.opacity]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Resolved property values written to an element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotate: 0.0,
        opacity: 1.0,
    };

    /// Interpolate every property toward `other`
    pub fn lerp(&self, other: &Transform, t: f64) -> Transform {
        Transform {
            x: lerp(self.x, other.x, t),
            y: lerp(self.y, other.y, t),
            scale: lerp(self.scale, other.scale, t),
            rotate: lerp(self.rotate, other.rotate, t),
            opacity: lerp(self.opacity, other.opacity, t),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Opacity clamped for rendering; eased values may overshoot
    pub fn visible_opacity(&self) -> f64 {
        self.opacity.clamp(0.0, 1.0)
    }

    /// Whether the element should be drawn at all
    pub fn is_visible(&self) -> bool {
        self.visible_opacity() > 0.01 && self.scale > 0.0
    }

    pub fn approx_eq(&self, other: &Transform, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
            && (self.rotate - other.rotate).abs() <= epsilon
            && (self.opacity - other.opacity).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_units() {
        let vp = Viewport::new(1280.0, 800.0);
        assert_eq!(Length::Vw(-18.0).resolve(&vp), -230.4);
        assert_eq!(Length::Vh(10.0).resolve(&vp), 80.0);
        assert_eq!(Length::Px(24.0).resolve(&vp), 24.0);
    }

    #[test]
    fn test_unset_properties_stay_resting() {
        let state = VisualState::resting().x(Length::Vw(-18.0)).opacity(0.0);
        let t = state.resolve(&Viewport::new(100.0, 100.0));
        assert_eq!(t.x, -18.0);
        assert_eq!(t.y, 0.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.rotate, 0.0);
        assert_eq!(t.opacity, 0.0);
    }

    #[test]
    fn test_transform_lerp() {
        let from = Transform {
            x: -60.0,
            opacity: 0.0,
            scale: 0.96,
            ..Transform::IDENTITY
        };
        let mid = from.lerp(&Transform::IDENTITY, 0.5);
        assert!((mid.x + 30.0).abs() < 1e-9);
        assert!((mid.opacity - 0.5).abs() < 1e-9);
        assert!((mid.scale - 0.98).abs() < 1e-9);
        assert!(from.lerp(&Transform::IDENTITY, 1.0).is_identity());
    }

    #[test]
    fn test_visibility() {
        assert!(Transform::IDENTITY.is_visible());
        assert!(!VisualState::hidden().resolve(&Viewport::new(1.0, 1.0)).is_visible());
    }
}
