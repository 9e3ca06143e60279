//! Registry of live scroll triggers
//!
//! Every scroll-linked binding (section timelines, reveals, intros and the
//! snap rule) is registered here and owned by the registry until released.
//! Sections register through [`TriggerRegistry::mount`], which hands back a
//! [`SectionHandle`]; releasing or dropping the handle removes every trigger
//! the section registered, exactly once.

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Instant;

use tracing::debug;

use crate::config::EngineConfig;
use crate::geometry::Viewport;
use crate::layout::{PageLayout, Span};
use crate::section::{SectionDescriptor, SectionId, SectionKind};
use crate::snap::SnapRule;
use crate::timeline::{ElementId, IntroTimeline, RevealBand, ScrubTimeline};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(u64);

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a trigger's scroll span is derived from the layout
#[derive(Debug, Clone, PartialEq)]
pub enum Measure {
    /// The pin spacing of a section
    Pin { section: SectionId },
    /// A reveal band anchored inside a section
    Reveal { section: SectionId, band: RevealBand },
    /// The whole scrollable extent
    Document,
    /// Not scroll driven
    Clock,
}

/// Playback state of an intro
#[derive(Debug, Clone)]
pub struct IntroPlayback {
    pub timeline: IntroTimeline,
    pub started: Option<Instant>,
    pub finished: bool,
}

impl IntroPlayback {
    pub fn new(timeline: IntroTimeline) -> Self {
        Self {
            timeline,
            started: None,
            finished: false,
        }
    }

    /// Whether the intro currently drives `id`
    pub fn owns(&self, id: &ElementId) -> bool {
        !self.finished && self.timeline.owns(id)
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Scrub(ScrubTimeline),
    Intro(IntroPlayback),
    Snap(SnapRule),
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    pub id: TriggerId,
    pub owner: Option<SectionId>,
    pub measure: Measure,
    /// Last measured span, in document scroll units
    pub span: Span,
    pub binding: Binding,
}

#[derive(Debug, Clone)]
struct MountedSection {
    id: SectionId,
    kind: SectionKind,
    elements: Vec<ElementId>,
}

#[derive(Debug, Default)]
pub struct RegistryState {
    next_id: u64,
    sections: Vec<MountedSection>,
    pub triggers: BTreeMap<TriggerId, ScrollTrigger>,
    released_elements: Vec<ElementId>,
    generation: u64,
}

impl RegistryState {
    fn register(&mut self, owner: Option<SectionId>, measure: Measure, binding: Binding) -> TriggerId {
        self.next_id += 1;
        let id = TriggerId(self.next_id);
        self.triggers.insert(
            id,
            ScrollTrigger {
                id,
                owner,
                measure,
                span: Span::default(),
                binding,
            },
        );
        id
    }

    fn release_section(&mut self, section: &SectionId, triggers: &[TriggerId]) -> usize {
        let released = triggers
            .iter()
            .filter(|id| self.triggers.remove(id).is_some())
            .count();
        if let Some(index) = self.sections.iter().position(|s| &s.id == section) {
            let mounted = self.sections.remove(index);
            self.released_elements.extend(mounted.elements);
        }
        self.generation += 1;
        released
    }
}

/// Shared handle to the trigger table
///
/// Cloning shares the same table. The engine is single threaded, so the
/// table lives behind `Rc<RefCell<_>>`.
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    inner: Rc<RefCell<RegistryState>>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every binding a section needs and return its release handle
    pub fn mount(&self, descriptor: &SectionDescriptor, config: &EngineConfig) -> Result<SectionHandle> {
        descriptor.validate()?;

        let mut state = self.inner.borrow_mut();
        if state.sections.iter().any(|s| s.id == descriptor.id) {
            return Err(Error::section(descriptor.id.as_str(), "already mounted"));
        }

        let owner = Some(descriptor.id.clone());
        let reset = descriptor.reset_on_leave_back && config.reset_on_leave_back;
        let mut triggers = Vec::new();

        if descriptor.is_pinned() {
            let timeline = ScrubTimeline::new(descriptor.elements.clone(), config.pin_scrub(), reset);
            triggers.push(state.register(
                owner.clone(),
                Measure::Pin {
                    section: descriptor.id.clone(),
                },
                Binding::Scrub(timeline),
            ));
        }

        for reveal in &descriptor.reveals {
            let timeline = ScrubTimeline::new(reveal.elements.clone(), config.reveal_scrub(), false);
            triggers.push(state.register(
                owner.clone(),
                Measure::Reveal {
                    section: descriptor.id.clone(),
                    band: reveal.band,
                },
                Binding::Scrub(timeline),
            ));
        }

        if let Some(intro) = &descriptor.intro {
            triggers.push(state.register(
                owner.clone(),
                Measure::Clock,
                Binding::Intro(IntroPlayback::new(intro.clone())),
            ));
        }

        state.sections.push(MountedSection {
            id: descriptor.id.clone(),
            kind: descriptor.kind,
            elements: descriptor.element_ids(),
        });
        state.generation += 1;

        debug!(section = %descriptor.id, triggers = triggers.len(), "section mounted");

        Ok(SectionHandle {
            section: descriptor.id.clone(),
            triggers,
            registry: Rc::downgrade(&self.inner),
            released: false,
        })
    }

    /// Register a free-standing trigger not owned by any section
    pub fn register(&self, measure: Measure, binding: Binding) -> TriggerId {
        self.inner.borrow_mut().register(None, measure, binding)
    }

    /// Remove one trigger; false when it was already gone
    pub fn release(&self, id: TriggerId) -> bool {
        self.inner.borrow_mut().triggers.remove(&id).is_some()
    }

    /// Release every trigger and section; returns the number of triggers removed
    pub fn clear(&self) -> usize {
        let mut state = self.inner.borrow_mut();
        let count = state.triggers.len();
        state.triggers.clear();
        let sections = std::mem::take(&mut state.sections);
        state
            .released_elements
            .extend(sections.into_iter().flat_map(|s| s.elements));
        state.generation += 1;
        count
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().triggers.is_empty()
    }

    pub fn contains(&self, id: TriggerId) -> bool {
        self.inner.borrow().triggers.contains_key(&id)
    }

    pub fn section_count(&self) -> usize {
        self.inner.borrow().sections.len()
    }

    pub fn is_mounted(&self, section: &SectionId) -> bool {
        self.inner.borrow().sections.iter().any(|s| &s.id == section)
    }

    /// Bumped on every mount and release
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Lay out the mounted sections in mount order
    pub fn measure(&self, viewport: Viewport) -> PageLayout {
        let state = self.inner.borrow();
        PageLayout::measure(state.sections.iter().map(|s| (&s.id, &s.kind)), viewport)
    }

    /// Re-measure every trigger span against `layout`
    pub fn refresh(&self, layout: &PageLayout) {
        let mut state = self.inner.borrow_mut();
        for trigger in state.triggers.values_mut() {
            trigger.span = match &trigger.measure {
                Measure::Pin { section } => layout.pin_span(section).unwrap_or_default(),
                Measure::Reveal { section, band } => layout.reveal_span(section, band).unwrap_or_default(),
                Measure::Document => Span::new(0.0, layout.max_scroll()),
                Measure::Clock => Span::default(),
            };
            if let Binding::Scrub(timeline) = &mut trigger.binding {
                timeline.invalidate();
            }
        }
    }

    /// Spans of the registered pinned sections, sorted by start
    pub fn pinned_spans(&self) -> Vec<Span> {
        let state = self.inner.borrow();
        let mut spans: Vec<Span> = state
            .triggers
            .values()
            .filter(|t| matches!(t.measure, Measure::Pin { .. }))
            .map(|t| t.span)
            .filter(|span| !span.is_empty())
            .collect();
        spans.sort_by(|a, b| a.start.total_cmp(&b.start));
        spans
    }

    /// Snap rule installed under `id`, if that trigger is still live
    pub fn snap_rule(&self, id: TriggerId) -> Option<SnapRule> {
        match self.inner.borrow().triggers.get(&id) {
            Some(ScrollTrigger {
                binding: Binding::Snap(rule),
                ..
            }) => Some(rule.clone()),
            _ => None,
        }
    }

    /// Playhead of a section's pinned timeline
    pub fn playhead(&self, section: &SectionId) -> Option<f64> {
        let state = self.inner.borrow();
        state.triggers.values().find_map(|t| match (&t.measure, &t.binding) {
            (Measure::Pin { section: s }, Binding::Scrub(timeline)) if s == section => {
                Some(timeline.playhead())
            }
            _ => None,
        })
    }

    /// Trigger ids owned by `section`
    pub fn triggers_for(&self, section: &SectionId) -> Vec<TriggerId> {
        self.inner
            .borrow()
            .triggers
            .values()
            .filter(|t| t.owner.as_ref() == Some(section))
            .map(|t| t.id)
            .collect()
    }

    /// Elements of sections released since the last call
    pub fn take_released_elements(&self) -> Vec<ElementId> {
        std::mem::take(&mut self.inner.borrow_mut().released_elements)
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, RegistryState> {
        self.inner.borrow_mut()
    }
}

/// Scoped registration of one section
///
/// Release runs exactly once, either through [`SectionHandle::release`] or
/// when the handle is dropped. A handle outliving its registry releases
/// nothing.
#[derive(Debug)]
pub struct SectionHandle {
    section: SectionId,
    triggers: Vec<TriggerId>,
    registry: Weak<RefCell<RegistryState>>,
    released: bool,
}

impl SectionHandle {
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    pub fn triggers(&self) -> &[TriggerId] {
        &self.triggers
    }

    /// Release the section's triggers; returns how many were still live
    pub fn release(mut self) -> usize {
        self.release_once()
    }

    fn release_once(&mut self) -> usize {
        if self.released {
            return 0;
        }
        self.released = true;

        let Some(registry) = self.registry.upgrade() else {
            return 0;
        };
        let released = registry.borrow_mut().release_section(&self.section, &self.triggers);
        debug!(section = %self.section, released, "section released");
        released
    }
}

impl Drop for SectionHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}
