//! Document geometry derived from the mounted sections and the viewport
//!
//! Pinned sections take one viewport height of their own plus pin spacing
//! (`scroll_length` viewport heights) in document flow; while the scroll
//! offset is inside that spacing the section stays at the top of the
//! viewport. Inline sections take their declared height.

use crate::geometry::Viewport;
use crate::motion::band_progress;
use crate::section::{SectionId, SectionKind};
use crate::timeline::RevealBand;

/// A scroll range in document units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Progress of `scroll` through the span, clamped to [0, 1]
    pub fn progress(&self, scroll: f64) -> f64 {
        band_progress(scroll, self.start, self.end)
    }

    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll <= self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionGeometry {
    pub id: SectionId,
    /// Document offset of the section top
    pub top: f64,
    /// Visual height of the section
    pub height: f64,
    /// Extra scroll distance during which the section is pinned
    pub pin_spacing: f64,
}

impl SectionGeometry {
    /// Space taken in document flow
    pub fn flow_height(&self) -> f64 {
        self.height + self.pin_spacing
    }

    pub fn is_pinned(&self) -> bool {
        self.pin_spacing > 0.0
    }

    pub fn pin_span(&self) -> Option<Span> {
        self.is_pinned()
            .then(|| Span::new(self.top, self.top + self.pin_spacing))
    }

    /// Where the section top appears on screen at `scroll`
    pub fn screen_top(&self, scroll: f64) -> f64 {
        if scroll < self.top {
            self.top - scroll
        } else if scroll <= self.top + self.pin_spacing {
            0.0
        } else {
            self.top + self.pin_spacing - scroll
        }
    }

    /// Whether any part of the section is on screen at `scroll`
    pub fn is_visible(&self, scroll: f64, viewport: &Viewport) -> bool {
        let top = self.screen_top(scroll);
        top < viewport.height && top + self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    viewport: Viewport,
    sections: Vec<SectionGeometry>,
    document_height: f64,
}

impl PageLayout {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            sections: Vec::new(),
            document_height: 0.0,
        }
    }

    /// Stack sections top to bottom in the given order
    pub fn measure<'a, I>(sections: I, viewport: Viewport) -> Self
    where
        I: IntoIterator<Item = (&'a SectionId, &'a SectionKind)>,
    {
        let mut top = 0.0;
        let sections = sections
            .into_iter()
            .map(|(id, kind)| {
                let (height, pin_spacing) = match *kind {
                    SectionKind::Pinned { scroll_length } => {
                        (viewport.height, scroll_length * viewport.height)
                    }
                    SectionKind::Inline { height } => (height * viewport.height, 0.0),
                };
                let geometry = SectionGeometry {
                    id: id.clone(),
                    top,
                    height,
                    pin_spacing,
                };
                top += geometry.flow_height();
                geometry
            })
            .collect();

        Self {
            viewport,
            sections,
            document_height: top,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn sections(&self) -> &[SectionGeometry] {
        &self.sections
    }

    pub fn section(&self, id: &SectionId) -> Option<&SectionGeometry> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Scrollable extent; zero when the document fits the viewport
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    pub fn clamp_scroll(&self, scroll: f64) -> f64 {
        scroll.clamp(0.0, self.max_scroll())
    }

    /// Scroll offset normalized against the scrollable extent
    pub fn fraction(&self, scroll: f64) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            0.0
        } else {
            (scroll / max).clamp(0.0, 1.0)
        }
    }

    pub fn scroll_at(&self, fraction: f64) -> f64 {
        fraction.clamp(0.0, 1.0) * self.max_scroll()
    }

    pub fn pin_span(&self, id: &SectionId) -> Option<Span> {
        self.section(id).and_then(SectionGeometry::pin_span)
    }

    pub fn reveal_span(&self, id: &SectionId, band: &RevealBand) -> Option<Span> {
        self.section(id).map(|s| {
            let (start, end) = band.span(s.top, &self.viewport);
            Span::new(start, end)
        })
    }

    /// Section under the top edge of the viewport
    pub fn section_at(&self, scroll: f64) -> Option<&SectionGeometry> {
        self.sections
            .iter()
            .find(|s| scroll >= s.top && scroll < s.top + s.flow_height())
            .or_else(|| self.sections.last())
    }

    /// Sections with something on screen, top to bottom
    pub fn visible_sections(&self, scroll: f64) -> impl Iterator<Item = &SectionGeometry> {
        let viewport = self.viewport;
        self.sections
            .iter()
            .filter(move |s| s.is_visible(scroll, &viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_pinned(vh: f64) -> PageLayout {
        let ids: Vec<SectionId> = ["one", "two", "three"].into_iter().map(SectionId::from).collect();
        let kind = SectionKind::Pinned { scroll_length: 1.3 };
        PageLayout::measure(ids.iter().map(|id| (id, &kind)), Viewport::new(1000.0, vh))
    }

    #[test]
    fn test_pinned_sections_stack_with_spacing() {
        let layout = three_pinned(100.0);
        assert!((layout.document_height() - 690.0).abs() < 1e-9);
        assert!((layout.max_scroll() - 590.0).abs() < 1e-9);

        let two = layout.section(&SectionId::from("two")).unwrap();
        assert!((two.top - 230.0).abs() < 1e-9);
        let span = two.pin_span().unwrap();
        assert!((span.end - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_top_holds_while_pinned() {
        let layout = three_pinned(100.0);
        let two = layout.section(&SectionId::from("two")).unwrap();
        assert!((two.screen_top(180.0) - 50.0).abs() < 1e-9);
        assert_eq!(two.screen_top(230.0), 0.0);
        assert_eq!(two.screen_top(300.0), 0.0);
        assert!((two.screen_top(400.0) + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_inline_sections() {
        let ids = [SectionId::from("reviews"), SectionId::from("order")];
        let kinds = [SectionKind::Inline { height: 1.2 }, SectionKind::Inline { height: 0.5 }];
        let layout = PageLayout::measure(ids.iter().zip(kinds.iter()), Viewport::new(100.0, 100.0));
        assert!((layout.document_height() - 170.0).abs() < 1e-9);
        assert!(layout.pin_span(&ids[0]).is_none());
    }

    #[test]
    fn test_no_overflow() {
        let id = SectionId::from("only");
        let kind = SectionKind::Inline { height: 0.5 };
        let layout = PageLayout::measure([(&id, &kind)], Viewport::new(100.0, 100.0));
        assert_eq!(layout.max_scroll(), 0.0);
        assert_eq!(layout.fraction(50.0), 0.0);
        assert_eq!(layout.clamp_scroll(50.0), 0.0);
    }

    #[test]
    fn test_section_at_and_visibility() {
        let layout = three_pinned(100.0);
        assert_eq!(layout.section_at(0.0).unwrap().id.as_str(), "one");
        assert_eq!(layout.section_at(250.0).unwrap().id.as_str(), "two");
        let visible: Vec<&str> = layout.visible_sections(180.0).map(|s| s.id.as_str()).collect();
        assert_eq!(visible, vec!["one", "two"]);
    }
}
