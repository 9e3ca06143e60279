//! Explicit keyframe schedules
//!
//! A [`Track`] is an ordered list of `(progress offset, target state, ease)`
//! pairs. Sampling is the only operation: the engine never sequences tweens
//! itself, it just asks each track for the state at the current playhead.

use crate::geometry::{Transform, Viewport, VisualState};
use crate::motion::Ease;

/// One point of a schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Progress offset in [0, 1]
    pub at: f64,
    /// State reached at `at`
    pub state: VisualState,
    /// Curve used on the segment that ends at this keyframe
    pub ease: Ease,
}

impl Keyframe {
    pub fn new(at: f64, state: VisualState, ease: Ease) -> Self {
        Self { at, state, ease }
    }
}

/// Ordered keyframes for one element
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Build a track, rejecting empty, out-of-range or unordered schedules
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self, &'static str> {
        if keyframes.is_empty() {
            return Err("schedule has no keyframes");
        }
        let unit = Viewport::new(100.0, 100.0);
        for keyframe in &keyframes {
            if !(0.0..=1.0).contains(&keyframe.at) {
                return Err("keyframe offset outside [0, 1]");
            }
            if !keyframe.state.is_finite(&unit) {
                return Err("keyframe state is not finite");
            }
        }
        if keyframes.windows(2).any(|pair| pair[1].at < pair[0].at) {
            return Err("keyframe offsets must not decrease");
        }
        Ok(Self { keyframes })
    }

    /// A track that holds the resting state throughout
    pub fn resting() -> Self {
        Self {
            keyframes: vec![Keyframe::new(0.0, VisualState::RESTING, Ease::Linear)],
        }
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// State at `progress`
    ///
    /// Before the first keyframe the first state holds; after the last the
    /// last state holds. Between two keyframes the segment's ease shapes the
    /// interpolation.
    pub fn sample(&self, progress: f64, viewport: &Viewport) -> Transform {
        let p = progress.clamp(0.0, 1.0);
        let first = &self.keyframes[0];
        if p <= first.at {
            return first.state.resolve(viewport);
        }

        // Last keyframe whose offset has been reached
        let idx = self.keyframes.partition_point(|k| k.at <= p) - 1;
        let from = &self.keyframes[idx];
        let Some(to) = self.keyframes.get(idx + 1) else {
            return from.state.resolve(viewport);
        };

        let span = to.at - from.at;
        let t = if span > 0.0 { (p - from.at) / span } else { 1.0 };
        from.state
            .resolve(viewport)
            .lerp(&to.state.resolve(viewport), to.ease.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Length;

    fn vp() -> Viewport {
        Viewport::new(100.0, 100.0)
    }

    fn slide_in_out() -> Track {
        let from = VisualState::hidden().x(Length::Vw(-60.0));
        let exit = VisualState::hidden().x(Length::Vw(-18.0));
        Track::new(vec![
            Keyframe::new(0.0, from, Ease::Linear),
            Keyframe::new(0.3, VisualState::RESTING, Ease::Linear),
            Keyframe::new(0.7, VisualState::RESTING, Ease::Linear),
            Keyframe::new(1.0, exit, Ease::Power2In),
        ])
        .unwrap()
    }

    #[test]
    fn test_anchor_states() {
        let track = slide_in_out();
        let start = track.sample(0.0, &vp());
        assert_eq!(start.x, -60.0);
        assert_eq!(start.opacity, 0.0);
        assert!(track.sample(0.3, &vp()).is_identity());
        assert!(track.sample(0.5, &vp()).is_identity());
        assert!(track.sample(0.7, &vp()).is_identity());
        let end = track.sample(1.0, &vp());
        assert_eq!(end.x, -18.0);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn test_monotonic_between_anchors() {
        let track = slide_in_out();
        let mut prev = track.sample(0.0, &vp());
        for i in 1..=30 {
            let t = track.sample(i as f64 / 100.0, &vp());
            assert!(t.x >= prev.x && t.opacity >= prev.opacity, "entrance at {}", i);
            prev = t;
        }
        for i in 70..=100 {
            let t = track.sample(i as f64 / 100.0, &vp());
            assert!(t.x <= prev.x && t.opacity <= prev.opacity, "exit at {}", i);
            prev = t;
        }
    }

    #[test]
    fn test_before_first_keyframe_holds_first_state() {
        let from = VisualState::hidden().y(Length::Vh(6.0));
        let track = Track::new(vec![
            Keyframe::new(0.15, from, Ease::Linear),
            Keyframe::new(0.3, VisualState::RESTING, Ease::Linear),
        ])
        .unwrap();
        assert_eq!(track.sample(0.0, &vp()), from.resolve(&vp()));
        assert_eq!(track.sample(0.15, &vp()), from.resolve(&vp()));
        assert!(track.sample(0.9, &vp()).is_identity());
    }

    #[test]
    fn test_coincident_keyframes_jump() {
        let hidden = VisualState::hidden();
        let track = Track::new(vec![
            Keyframe::new(0.0, VisualState::RESTING, Ease::Linear),
            Keyframe::new(0.5, VisualState::RESTING, Ease::Linear),
            Keyframe::new(0.5, hidden, Ease::Linear),
        ])
        .unwrap();
        assert_eq!(track.sample(0.49, &vp()).opacity, 1.0);
        assert_eq!(track.sample(0.5, &vp()).opacity, 0.0);
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(Track::new(vec![]).is_err());
        assert!(Track::new(vec![Keyframe::new(1.5, VisualState::RESTING, Ease::Linear)]).is_err());
        assert!(Track::new(vec![
            Keyframe::new(0.6, VisualState::RESTING, Ease::Linear),
            Keyframe::new(0.2, VisualState::RESTING, Ease::Linear),
        ])
        .is_err());
        assert!(Track::new(vec![Keyframe::new(
            0.0,
            VisualState::RESTING.scale(f64::NAN),
            Ease::Linear
        )])
        .is_err());
    }
}
