//! Time-bounded scroll transition used for snapping and navigation
//!
//! Call `start()` to begin a transition, then `update()` each frame to get
//! the interpolated scroll offset.

use std::time::{Duration, Instant};

use crate::config::SnapConfig;
use crate::motion::timing::{is_complete, lerp, progress};
use crate::motion::Ease;

/// Distances below this are treated as already settled
const SETTLED_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
struct ActiveTransition {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
}

#[derive(Debug, Clone)]
pub struct ScrollTransition {
    animation: Option<ActiveTransition>,
    min_duration: Duration,
    max_duration: Duration,
    ease: Ease,
}

impl ScrollTransition {
    pub fn new(min_duration: Duration, max_duration: Duration, ease: Ease) -> Self {
        Self {
            animation: None,
            min_duration: min_duration.min(max_duration),
            max_duration: max_duration.max(min_duration),
            ease,
        }
    }

    pub fn from_config(config: &SnapConfig) -> Self {
        Self::new(config.min_duration(), config.max_duration(), config.ease)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final offset of the running transition
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Duration for travelling `distance`, scaled by how much of a viewport it covers
    pub fn duration_for(&self, distance: f64, viewport_height: f64) -> Duration {
        let ratio = if viewport_height > 0.0 {
            (distance.abs() / viewport_height).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let span = self.max_duration.saturating_sub(self.min_duration);
        self.min_duration + span.mul_f64(ratio)
    }

    /// Begin moving from `from` to `to`; returns false when there is nowhere to go
    pub fn start(&mut self, from: f64, to: f64, viewport_height: f64, now: Instant) -> bool {
        if (to - from).abs() < SETTLED_EPSILON {
            self.animation = None;
            return false;
        }
        self.animation = Some(ActiveTransition {
            start: now,
            from,
            to,
            duration: self.duration_for(to - from, viewport_height),
        });
        true
    }

    /// Offset at `now`; `None` when idle. The final frame lands exactly on the target.
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_ref()?;
        if is_complete(anim.start, now, anim.duration) {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }
        let t = self.ease.apply(progress(anim.start, now, anim.duration));
        Some(lerp(anim.from, anim.to, t))
    }

    /// Stop where we are; a new gesture overrides the transition
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> ScrollTransition {
        ScrollTransition::from_config(&SnapConfig::default())
    }

    #[test]
    fn test_duration_bounds() {
        let t = transition();
        assert_eq!(t.duration_for(0.0, 100.0), Duration::from_millis(150));
        assert_eq!(t.duration_for(500.0, 100.0), Duration::from_millis(350));
        assert_eq!(t.duration_for(-50.0, 100.0), Duration::from_millis(250));
    }

    #[test]
    fn test_runs_to_target() {
        let mut t = transition();
        let now = Instant::now();
        assert!(t.start(0.0, 100.0, 100.0, now));
        assert_eq!(t.target(), Some(100.0));

        let mid = t.update(now + Duration::from_millis(100)).unwrap();
        assert!(mid > 0.0 && mid < 100.0);

        assert_eq!(t.update(now + Duration::from_millis(400)), Some(100.0));
        assert!(!t.is_animating());
        assert_eq!(t.update(now + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_decelerates() {
        let mut t = transition();
        let now = Instant::now();
        t.start(0.0, 100.0, 100.0, now);
        // Power2Out covers more than half the distance at half time
        let half = t.update(now + Duration::from_millis(175)).unwrap();
        assert!(half > 50.0);
    }

    #[test]
    fn test_no_op_and_cancel() {
        let mut t = transition();
        let now = Instant::now();
        assert!(!t.start(42.0, 42.0, 100.0, now));
        assert!(!t.is_animating());

        t.start(0.0, 10.0, 100.0, now);
        t.cancel();
        assert_eq!(t.update(now), None);
    }
}
