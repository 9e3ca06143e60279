//! One-shot reveals for sections that scroll normally
//!
//! A reveal plays while its anchor travels up the viewport: it starts when
//! the anchor's top edge crosses `start_line` (a fraction of viewport
//! height measured from the top) and completes at `end_line`. Items of a
//! group share the band and stagger by a fixed delay.

use crate::geometry::{Viewport, VisualState};
use crate::motion::Ease;
use crate::timeline::element::{AnimatedElement, ElementId};
use crate::timeline::track::Keyframe;
use crate::{Error, Result};

/// Where a reveal sits relative to its section and the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealBand {
    /// Anchor's top edge below the section top, in viewport heights
    pub offset: f64,
    /// Viewport line (0 = top, 1 = bottom) where the reveal starts
    pub start_line: f64,
    /// Viewport line where the reveal completes
    pub end_line: f64,
}

impl RevealBand {
    pub fn new(offset: f64, start_line: f64, end_line: f64) -> Self {
        Self {
            offset,
            start_line,
            end_line,
        }
    }

    /// Scroll span `(start, end)` for a section whose top is at `section_top`
    pub fn span(&self, section_top: f64, viewport: &Viewport) -> (f64, f64) {
        let anchor = section_top + self.offset * viewport.height;
        (
            anchor - self.start_line * viewport.height,
            anchor - self.end_line * viewport.height,
        )
    }
}

/// A band plus the elements it animates
#[derive(Debug, Clone, PartialEq)]
pub struct Reveal {
    pub band: RevealBand,
    pub elements: Vec<AnimatedElement>,
}

/// Builder for a staggered group sharing one entry state
#[derive(Debug, Clone)]
pub struct RevealGroup {
    band: RevealBand,
    from: VisualState,
    ids: Vec<ElementId>,
    stagger: f64,
    item_duration: f64,
    ease: Ease,
}

impl RevealGroup {
    pub fn new(band: RevealBand, from: VisualState) -> Self {
        Self {
            band,
            from,
            ids: Vec::new(),
            stagger: 0.0,
            item_duration: 0.6,
            ease: Ease::Power1Out,
        }
    }

    pub fn item(mut self, id: impl Into<ElementId>) -> Self {
        self.ids.push(id.into());
        self
    }

    /// Delay between consecutive items, in the same unit as the item duration
    pub fn stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn item_duration(mut self, duration: f64) -> Self {
        self.item_duration = duration;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn build(self) -> Result<Reveal> {
        let label = self
            .ids
            .first()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "reveal".to_string());
        if self.ids.is_empty() {
            return Err(Error::schedule(label, "reveal group has no items"));
        }
        if self.band.end_line >= self.band.start_line {
            return Err(Error::schedule(label, "reveal must end above where it starts"));
        }
        if self.item_duration <= 0.0 || self.stagger < 0.0 {
            return Err(Error::schedule(label, "reveal timing must be positive"));
        }

        // The whole group, stagger included, is squeezed into the band
        let total = self.item_duration + self.stagger * (self.ids.len() - 1) as f64;
        let elements = self
            .ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| {
                let start = i as f64 * self.stagger / total;
                let end = (i as f64 * self.stagger + self.item_duration) / total;
                AnimatedElement::new(
                    id,
                    vec![
                        Keyframe::new(start, self.from, Ease::Linear),
                        Keyframe::new(end.min(1.0), VisualState::RESTING, self.ease),
                    ],
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Reveal {
            band: self.band,
            elements,
        })
    }
}
