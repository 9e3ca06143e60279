//! Section descriptors: the static page composition handed to the engine

use std::collections::HashSet;
use std::fmt;

use crate::timeline::{AnimatedElement, ElementId, IntroTimeline, Reveal};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How a section occupies the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionKind {
    /// Fixed in the viewport for `scroll_length` viewport heights of scrolling
    Pinned { scroll_length: f64 },
    /// Scrolls normally; `height` in viewport heights
    Inline { height: f64 },
}

impl SectionKind {
    pub fn is_pinned(&self) -> bool {
        matches!(self, SectionKind::Pinned { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub kind: SectionKind,
    /// Scroll-linked elements of a pinned section, in declaration order
    pub elements: Vec<AnimatedElement>,
    /// One-shot reveals of an inline section
    pub reveals: Vec<Reveal>,
    /// Time-based intro played on mount
    pub intro: Option<IntroTimeline>,
    /// Force elements back to identity when scrolling back above the pin
    pub reset_on_leave_back: bool,
}

impl SectionDescriptor {
    pub fn pinned(id: impl Into<SectionId>, scroll_length: f64) -> Self {
        Self::with_kind(id.into(), SectionKind::Pinned { scroll_length })
    }

    pub fn inline(id: impl Into<SectionId>, height: f64) -> Self {
        Self::with_kind(id.into(), SectionKind::Inline { height })
    }

    fn with_kind(id: SectionId, kind: SectionKind) -> Self {
        Self {
            id,
            kind,
            elements: Vec::new(),
            reveals: Vec::new(),
            intro: None,
            reset_on_leave_back: false,
        }
    }

    pub fn element(mut self, element: AnimatedElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn elements(mut self, elements: impl IntoIterator<Item = AnimatedElement>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn reveal(mut self, reveal: Reveal) -> Self {
        self.reveals.push(reveal);
        self
    }

    pub fn intro(mut self, intro: IntroTimeline) -> Self {
        self.intro = Some(intro);
        self
    }

    pub fn reset_on_leave_back(mut self, reset: bool) -> Self {
        self.reset_on_leave_back = reset;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.kind.is_pinned()
    }

    /// Every node this section animates, deduplicated, in first-use order
    pub fn element_ids(&self) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        self.elements
            .iter()
            .chain(self.reveals.iter().flat_map(|r| r.elements.iter()))
            .chain(self.intro.iter().flat_map(|i| i.elements().iter()))
            .map(|e| e.id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        match self.kind {
            SectionKind::Pinned { scroll_length } => {
                if !(scroll_length > 0.0 && scroll_length.is_finite()) {
                    return Err(Error::section(self.id.as_str(), "pin length must be positive"));
                }
                if !self.reveals.is_empty() {
                    return Err(Error::section(self.id.as_str(), "pinned sections animate through their pin, not reveals"));
                }
            }
            SectionKind::Inline { height } => {
                if !(height > 0.0 && height.is_finite()) {
                    return Err(Error::section(self.id.as_str(), "height must be positive"));
                }
                if !self.elements.is_empty() {
                    return Err(Error::section(self.id.as_str(), "inline sections have no pin to scrub"));
                }
            }
        }

        let mut seen = HashSet::new();
        let scroll_linked = self
            .elements
            .iter()
            .chain(self.reveals.iter().flat_map(|r| r.elements.iter()));
        for element in scroll_linked {
            if !seen.insert(&element.id) {
                return Err(Error::section(
                    self.id.as_str(),
                    format!("element {} is scheduled twice", element.id),
                ));
            }
        }
        Ok(())
    }
}
