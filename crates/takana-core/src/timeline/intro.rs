//! Time-based intro played once when a section mounts
//!
//! Unlike scroll timelines the playhead is driven by the frame clock. While
//! an intro plays it owns its elements; scroll timelines leave them alone
//! until it finishes.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::geometry::VisualState;
use crate::motion::timing;
use crate::motion::Ease;
use crate::timeline::element::{AnimatedElement, ElementId};
use crate::timeline::track::Keyframe;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct IntroTimeline {
    duration: Duration,
    elements: Vec<AnimatedElement>,
}

impl IntroTimeline {
    pub fn builder() -> IntroBuilder {
        IntroBuilder::default()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elements(&self) -> &[AnimatedElement] {
        &self.elements
    }

    pub fn owns(&self, id: &ElementId) -> bool {
        self.elements.iter().any(|e| &e.id == id)
    }

    /// Playhead for an intro started at `start`
    pub fn progress_at(&self, start: Instant, now: Instant) -> f64 {
        timing::progress(start, now, self.duration)
    }
}

#[derive(Debug, Clone)]
struct Tween {
    id: ElementId,
    from: VisualState,
    start: f64,
    duration: f64,
    ease: Ease,
}

/// Collects tweens positioned in seconds, like a hand-authored intro sequence
#[derive(Debug, Clone, Default)]
pub struct IntroBuilder {
    tweens: Vec<Tween>,
}

impl IntroBuilder {
    /// Animate `id` from `from` to resting, starting at `start` seconds
    pub fn tween(
        mut self,
        id: impl Into<ElementId>,
        from: VisualState,
        start: f64,
        duration: f64,
        ease: Ease,
    ) -> Self {
        self.tweens.push(Tween {
            id: id.into(),
            from,
            start,
            duration,
            ease,
        });
        self
    }

    pub fn build(self) -> Result<IntroTimeline> {
        let mut seen = HashSet::new();
        for tween in &self.tweens {
            if !seen.insert(tween.id.clone()) {
                return Err(Error::schedule(tween.id.as_str(), "element tweened twice in intro"));
            }
            if tween.start < 0.0 || tween.duration <= 0.0 {
                return Err(Error::schedule(tween.id.as_str(), "intro tween needs a positive duration"));
            }
        }

        let total = self
            .tweens
            .iter()
            .map(|t| t.start + t.duration)
            .fold(0.0_f64, f64::max);
        if total <= 0.0 {
            return Err(Error::Other("intro has no tweens".to_string()));
        }

        let elements = self
            .tweens
            .into_iter()
            .map(|t| {
                AnimatedElement::new(
                    t.id,
                    vec![
                        Keyframe::new(t.start / total, t.from, Ease::Linear),
                        Keyframe::new(((t.start + t.duration) / total).min(1.0), VisualState::RESTING, t.ease),
                    ],
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IntroTimeline {
            duration: Duration::from_secs_f64(total),
            elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Length, Viewport};

    fn intro() -> IntroTimeline {
        IntroTimeline::builder()
            .tween("bg", VisualState::hidden().scale(1.08), 0.0, 0.9, Ease::Power2Out)
            .tween("line1", VisualState::hidden().y(Length::Px(40.0)), 0.4, 0.7, Ease::Power3Out)
            .tween("stamp", VisualState::hidden().scale(0.6).rotate(-25.0), 1.16, 0.65, Ease::BackOut(1.8))
            .build()
            .unwrap()
    }

    #[test]
    fn test_duration_covers_last_tween() {
        let intro = intro();
        assert!((intro.duration().as_secs_f64() - 1.81).abs() < 1e-9);
        assert!(intro.owns(&ElementId::from("stamp")));
        assert!(!intro.owns(&ElementId::from("cta")));
    }

    #[test]
    fn test_elements_start_hidden_and_finish_resting() {
        let intro = intro();
        let vp = Viewport::new(100.0, 100.0);
        let start = Instant::now();
        let p0 = intro.progress_at(start, start);
        let p1 = intro.progress_at(start, start + Duration::from_secs(2));
        for element in intro.elements() {
            assert_eq!(element.track.sample(p0, &vp).opacity, 0.0);
            assert!(element.track.sample(p1, &vp).is_identity());
        }
    }

    #[test]
    fn test_duplicate_tween_rejected() {
        let result = IntroTimeline::builder()
            .tween("bg", VisualState::hidden(), 0.0, 0.5, Ease::Linear)
            .tween("bg", VisualState::hidden(), 0.5, 0.5, Ease::Linear)
            .build();
        assert!(result.is_err());
    }
}
