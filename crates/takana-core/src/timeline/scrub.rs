//! Scroll-linked playback of a set of element tracks
//!
//! The playhead follows the trigger's scroll progress, optionally lagging
//! behind it (scrub smoothing). Writes only happen when the playhead moves
//! or the timeline is invalidated.

use std::time::Duration;

use crate::geometry::{Transform, Viewport};
use crate::layout::Span;
use crate::motion::smooth_toward;
use crate::stage::AnimationTarget;
use crate::timeline::element::{AnimatedElement, ElementId};

/// Per-frame inputs shared by every timeline
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub scroll: f64,
    pub dt: Duration,
    pub viewport: &'a Viewport,
}

#[derive(Debug, Clone)]
pub struct ScrubTimeline {
    elements: Vec<AnimatedElement>,
    lag: Duration,
    reset_on_leave_back: bool,
    playhead: f64,
    target: f64,
    /// Whether the last frame was at or past the span start; `None` before the first frame
    past_start: Option<bool>,
    /// Playhead at the last write; `None` forces the next frame to write
    rendered: Option<f64>,
    /// Set by a leave-back reset, cleared when scroll re-enters the span
    parked: bool,
}

impl ScrubTimeline {
    pub fn new(elements: Vec<AnimatedElement>, lag: Duration, reset_on_leave_back: bool) -> Self {
        Self {
            elements,
            lag,
            reset_on_leave_back,
            playhead: 0.0,
            target: 0.0,
            past_start: None,
            rendered: None,
            parked: false,
        }
    }

    pub fn elements(&self) -> &[AnimatedElement] {
        &self.elements
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    /// Scroll progress the playhead is heading for
    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.parked || self.playhead == self.target
    }

    /// Force a write on the next frame (viewport units changed, owner released)
    pub fn invalidate(&mut self) {
        self.rendered = None;
    }

    /// Advance one frame and write changed states into `target`
    ///
    /// `owned_elsewhere` names elements another timeline currently drives;
    /// they are left untouched. Returns true while the playhead is still
    /// catching up with scroll.
    pub fn advance(
        &mut self,
        span: &Span,
        frame: &FrameContext<'_>,
        target: &mut dyn AnimationTarget,
        owned_elsewhere: &dyn Fn(&ElementId) -> bool,
    ) -> bool {
        let past = frame.scroll >= span.start;
        let first_frame = self.past_start.is_none();
        let left_back = self.past_start == Some(true) && !past;
        self.past_start = Some(past);
        self.target = span.progress(frame.scroll);

        if left_back && self.reset_on_leave_back {
            // Drop any scrub lag so nothing is left mid-transition
            self.playhead = 0.0;
            self.target = 0.0;
            self.parked = true;
            // Identity is not the progress-0 sample; re-entry must write
            self.rendered = None;
            for element in &self.elements {
                if !owned_elsewhere(&element.id) {
                    target.write(&element.id, Transform::IDENTITY);
                }
            }
            return false;
        }

        if self.parked {
            if !past {
                return false;
            }
            self.parked = false;
        }

        self.playhead = if first_frame {
            self.target
        } else {
            smooth_toward(self.playhead, self.target, frame.dt, self.lag)
        };

        if self.rendered != Some(self.playhead) {
            for element in &self.elements {
                if !owned_elsewhere(&element.id) {
                    target.write(&element.id, element.track.sample(self.playhead, frame.viewport));
                }
            }
            self.rendered = Some(self.playhead);
        }

        self.playhead != self.target
    }
}
