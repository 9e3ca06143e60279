//! Schedules for pinned sections
//!
//! Progress through a pin span splits into three phases:
//!
//! ```text
//! 0 ──── entrance ──── entrance_end ──── dwell ──── exit_start ──── exit ──── 1
//! ```
//!
//! Each element enters from an off-canvas state (optionally delayed to
//! stagger it behind its neighbours), rests through the dwell window, then
//! leaves toward a second off-canvas state with an accelerating ease.

use crate::config::EngineConfig;
use crate::geometry::VisualState;
use crate::motion::Ease;
use crate::timeline::element::{AnimatedElement, ElementId};
use crate::timeline::track::Keyframe;
use crate::{Error, Result};

/// Phase boundaries of a pinned timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinPhases {
    pub entrance_end: f64,
    pub exit_start: f64,
}

impl Default for PinPhases {
    fn default() -> Self {
        Self {
            entrance_end: 0.3,
            exit_start: 0.7,
        }
    }
}

impl From<&EngineConfig> for PinPhases {
    fn from(config: &EngineConfig) -> Self {
        Self {
            entrance_end: config.entrance_end,
            exit_start: config.exit_start,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Phase {
    state: VisualState,
    delay: f64,
    ease: Ease,
}

/// Builder for one element of a pinned section
#[derive(Debug, Clone)]
pub struct PinnedMotion {
    id: ElementId,
    entrance: Option<Phase>,
    exit: Option<Phase>,
}

impl PinnedMotion {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            entrance: None,
            exit: None,
        }
    }

    /// Enter linearly from `from`, starting `delay` into the entrance phase
    pub fn enter(self, from: VisualState, delay: f64) -> Self {
        self.enter_with(from, delay, Ease::Linear)
    }

    pub fn enter_with(mut self, from: VisualState, delay: f64, ease: Ease) -> Self {
        self.entrance = Some(Phase {
            state: from,
            delay,
            ease,
        });
        self
    }

    /// Leave toward `to` with ease-in, starting `delay` into the exit phase
    pub fn exit(self, to: VisualState, delay: f64) -> Self {
        self.exit_with(to, delay, Ease::Power2In)
    }

    pub fn exit_with(mut self, to: VisualState, delay: f64, ease: Ease) -> Self {
        self.exit = Some(Phase {
            state: to,
            delay,
            ease,
        });
        self
    }

    pub fn build(self, phases: PinPhases) -> Result<AnimatedElement> {
        let mut keyframes = Vec::with_capacity(4);

        match self.entrance {
            Some(entrance) => {
                if !(0.0..phases.entrance_end).contains(&entrance.delay) {
                    return Err(Error::schedule(
                        self.id.as_str(),
                        format!(
                            "entrance delay {} must fall inside [0, {})",
                            entrance.delay, phases.entrance_end
                        ),
                    ));
                }
                keyframes.push(Keyframe::new(entrance.delay, entrance.state, Ease::Linear));
                keyframes.push(Keyframe::new(
                    phases.entrance_end,
                    VisualState::RESTING,
                    entrance.ease,
                ));
            }
            None => keyframes.push(Keyframe::new(0.0, VisualState::RESTING, Ease::Linear)),
        }

        if let Some(exit) = self.exit {
            let start = phases.exit_start + exit.delay;
            if exit.delay < 0.0 || start >= 1.0 {
                return Err(Error::schedule(
                    self.id.as_str(),
                    format!(
                        "exit delay {} must fall inside [0, {})",
                        exit.delay,
                        1.0 - phases.exit_start
                    ),
                ));
            }
            keyframes.push(Keyframe::new(start, VisualState::RESTING, Ease::Linear));
            keyframes.push(Keyframe::new(1.0, exit.state, exit.ease));
        }

        AnimatedElement::new(self.id, keyframes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Length, Transform, Viewport};

    fn vp() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    #[test]
    fn test_entrance_dwell_exit() {
        let element = PinnedMotion::new("brand.text")
            .enter(VisualState::hidden().x(Length::Vw(18.0)), 0.1)
            .exit(VisualState::hidden().x(Length::Vw(-10.0)), 0.0)
            .build(PinPhases::default())
            .unwrap();

        let track = &element.track;
        assert_eq!(track.sample(0.0, &vp()).x, 180.0);
        assert_eq!(track.sample(0.1, &vp()).x, 180.0);
        assert!(track.sample(0.3, &vp()).is_identity());
        assert!(track.sample(0.5, &vp()).is_identity());
        assert!(track.sample(0.7, &vp()).is_identity());
        assert_eq!(track.sample(1.0, &vp()).x, -100.0);
        assert_eq!(track.sample(1.0, &vp()).opacity, 0.0);
    }

    #[test]
    fn test_exit_uses_ease_in() {
        let element = PinnedMotion::new("hero.cta")
            .exit(VisualState::hidden().y(Length::Vh(10.0)), 0.0)
            .build(PinPhases::default())
            .unwrap();
        // Halfway through the exit an accelerating curve has covered less than half
        let mid = element.track.sample(0.85, &vp());
        assert!(mid.y < 40.0);
        assert!(mid.opacity > 0.5);
    }

    #[test]
    fn test_exit_only_rests_until_exit() {
        let element = PinnedMotion::new("hero.headline")
            .exit(VisualState::hidden().x(Length::Vw(-18.0)), 0.0)
            .build(PinPhases::default())
            .unwrap();
        assert_eq!(element.track.sample(0.0, &vp()), Transform::IDENTITY);
        assert_eq!(element.track.sample(0.69, &vp()), Transform::IDENTITY);
    }

    #[test]
    fn test_delays_out_of_phase_rejected() {
        let late_entrance = PinnedMotion::new("x")
            .enter(VisualState::hidden(), 0.3)
            .build(PinPhases::default());
        assert!(late_entrance.is_err());

        let late_exit = PinnedMotion::new("x")
            .exit(VisualState::hidden(), 0.3)
            .build(PinPhases::default());
        assert!(late_exit.is_err());
    }

    #[test]
    fn test_phases_from_config() {
        let config = EngineConfig {
            entrance_end: 0.25,
            exit_start: 0.75,
            ..Default::default()
        };
        let phases = PinPhases::from(&config);
        let element = PinnedMotion::new("x")
            .enter(VisualState::hidden(), 0.0)
            .build(phases)
            .unwrap();
        assert!(element.track.sample(0.25, &vp()).is_identity());
    }
}
