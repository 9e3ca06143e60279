//! Scroll engine: the single entry point a host drives
//!
//! The host feeds scroll input, gesture ends, resizes and a frame clock;
//! the engine keeps every registered timeline in step with the scroll
//! offset and writes resolved properties into its [`Stage`].

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{AppConfig, EngineConfig, SnapConfig};
use crate::geometry::Viewport;
use crate::layout::PageLayout;
use crate::nav::NavState;
use crate::registry::{Binding, SectionHandle, TriggerId, TriggerRegistry};
use crate::section::{SectionDescriptor, SectionId};
use crate::snap::{PinnedRange, ScrollTransition, SnapCoordinator};
use crate::stage::{AnimationTarget, Stage};
use crate::timeline::{ElementId, FrameContext};
use crate::{Error, Result};

#[derive(Debug)]
pub struct ScrollEngine {
    config: EngineConfig,
    registry: TriggerRegistry,
    stage: Stage,
    layout: PageLayout,
    scroll: f64,
    coordinator: SnapCoordinator,
    transition: ScrollTransition,
    last_frame: Option<Instant>,
    seen_generation: u64,
}

impl ScrollEngine {
    pub fn new(config: EngineConfig, snap: SnapConfig, viewport: Viewport) -> Self {
        let registry = TriggerRegistry::new();
        Self {
            config,
            layout: registry.measure(viewport),
            seen_generation: registry.generation(),
            registry,
            stage: Stage::new(),
            scroll: 0.0,
            transition: ScrollTransition::from_config(&snap),
            coordinator: SnapCoordinator::new(snap),
            last_frame: None,
        }
    }

    pub fn from_config(config: &AppConfig, viewport: Viewport) -> Self {
        Self::new(config.engine.clone(), config.snap.clone(), viewport)
    }

    /// Attach a section's nodes and register its timelines
    ///
    /// The returned handle owns the registration; dropping it unmounts the
    /// section.
    pub fn mount(&mut self, descriptor: &SectionDescriptor) -> Result<SectionHandle> {
        // Nodes of an earlier release must go before the same ids are attached again
        self.collect_released();

        let handle = self.registry.mount(descriptor, &self.config)?;
        for id in descriptor.element_ids() {
            self.stage.attach(id);
        }
        self.relayout();
        Ok(handle)
    }

    /// Mount a whole page and schedule the snap rule for after it settles
    pub fn mount_all(&mut self, descriptors: &[SectionDescriptor], now: Instant) -> Result<Vec<SectionHandle>> {
        let handles = descriptors
            .iter()
            .map(|d| self.mount(d))
            .collect::<Result<Vec<_>>>()?;
        self.coordinator.schedule(now, &self.registry);
        info!(
            sections = handles.len(),
            document_height = self.layout.document_height(),
            "page mounted"
        );
        Ok(handles)
    }

    /// Jump to `scroll`; a running transition is dropped
    pub fn scroll_to(&mut self, scroll: f64) {
        self.transition.cancel();
        self.scroll = self.layout.clamp_scroll(scroll);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll + delta);
    }

    /// The user stopped scrolling; start a snap transition if the rule asks for one
    ///
    /// Returns the target fraction when a transition started.
    pub fn end_gesture(&mut self, now: Instant) -> Option<f64> {
        let fraction = self.fraction();
        let target = self.coordinator.snap_target(&self.registry, fraction);
        if target == fraction {
            return None;
        }
        let to = self.layout.scroll_at(target);
        let started = self
            .transition
            .start(self.scroll, to, self.layout.viewport().height, now);
        if started {
            debug!(from = fraction, to = target, "snapping");
        }
        started.then_some(target)
    }

    /// Smooth-scroll to the top of a section
    pub fn scroll_to_section(&mut self, section: &SectionId, now: Instant) -> Result<()> {
        let top = self
            .layout
            .section(section)
            .map(|s| s.top)
            .ok_or_else(|| Error::SectionNotFound(section.to_string()))?;
        let to = self.layout.clamp_scroll(top);
        self.transition
            .start(self.scroll, to, self.layout.viewport().height, now);
        Ok(())
    }

    /// Advance one frame
    ///
    /// Returns true while anything is still moving (a transition, a lagging
    /// playhead, an intro, or a pending snap install), i.e. while the host
    /// should keep ticking at frame rate.
    pub fn tick(&mut self, now: Instant) -> bool {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        if let Some(scroll) = self.transition.update(now) {
            self.scroll = self.layout.clamp_scroll(scroll);
        }
        self.sync(now, dt)
    }

    /// Re-lay out for a new viewport, keeping the scroll fraction
    pub fn resize(&mut self, viewport: Viewport) {
        if *self.layout.viewport() == viewport {
            return;
        }
        let fraction = self.fraction();
        self.transition.cancel();
        self.layout = self.registry.measure(viewport);
        self.registry.refresh(&self.layout);
        self.scroll = self.layout.scroll_at(fraction);
        self.coordinator.recompute(&self.registry, &self.layout);
        debug!(
            width = viewport.width,
            height = viewport.height,
            max_scroll = self.layout.max_scroll(),
            "viewport resized"
        );
    }

    /// Measure pinned ranges and install the snap rule without waiting
    pub fn install_snap(&mut self) -> Option<TriggerId> {
        self.coordinator.install(&self.registry, &self.layout)
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.coordinator
            .set_enabled(enabled, &self.registry, &self.layout);
    }

    pub fn is_snap_enabled(&self) -> bool {
        self.coordinator.is_enabled()
    }

    /// Release every trigger and detach every node; returns the number of triggers released
    pub fn teardown(&mut self) -> usize {
        self.transition.cancel();
        let released = self.registry.clear();
        self.coordinator.uninstall(&self.registry);
        self.collect_released();
        self.relayout();
        info!(released, "engine torn down");
        released
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn fraction(&self) -> f64 {
        self.layout.fraction(self.scroll)
    }

    pub fn max_scroll(&self) -> f64 {
        self.layout.max_scroll()
    }

    pub fn viewport(&self) -> &Viewport {
        self.layout.viewport()
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &SnapCoordinator {
        &self.coordinator
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_animating()
    }

    /// Pinned ranges of the installed snap rule
    pub fn snap_ranges(&self) -> Vec<PinnedRange> {
        self.coordinator
            .rule(&self.registry)
            .map(|rule| rule.ranges().to_vec())
            .unwrap_or_default()
    }

    /// Playhead of a pinned section's timeline
    pub fn progress(&self, section: &SectionId) -> Option<f64> {
        self.registry.playhead(section)
    }

    pub fn nav_state(&self) -> NavState {
        NavState::for_scroll(self.scroll, self.layout.viewport().height)
    }

    fn relayout(&mut self) {
        self.layout = self.registry.measure(*self.layout.viewport());
        self.registry.refresh(&self.layout);
        self.scroll = self.layout.clamp_scroll(self.scroll);
        self.seen_generation = self.registry.generation();
        self.coordinator.recompute(&self.registry, &self.layout);
    }

    fn collect_released(&mut self) {
        for id in self.registry.take_released_elements() {
            self.stage.detach(&id);
        }
    }

    fn sync(&mut self, now: Instant, dt: Duration) -> bool {
        self.collect_released();
        if self.registry.generation() != self.seen_generation {
            self.relayout();
        }
        self.coordinator.poll(now, &self.registry, &self.layout);

        let viewport = *self.layout.viewport();
        let frame = FrameContext {
            scroll: self.scroll,
            dt,
            viewport: &viewport,
        };
        let stage: &mut Stage = &mut self.stage;
        let mut state = self.registry.state_mut();

        // Intros first: they own their elements until they finish
        let mut intro_running = false;
        let mut intro_finished = false;
        for trigger in state.triggers.values_mut() {
            let Binding::Intro(playback) = &mut trigger.binding else {
                continue;
            };
            if playback.finished {
                continue;
            }
            let start = *playback.started.get_or_insert(now);
            let progress = playback.timeline.progress_at(start, now);
            for element in playback.timeline.elements() {
                stage.write(&element.id, element.track.sample(progress, &viewport));
            }
            if progress >= 1.0 {
                playback.finished = true;
                intro_finished = true;
                debug!(trigger = %trigger.id, "intro finished");
            } else {
                intro_running = true;
            }
        }

        let owned: HashSet<ElementId> = state
            .triggers
            .values()
            .filter_map(|t| match &t.binding {
                Binding::Intro(playback) if !playback.finished => Some(playback.timeline.elements()),
                _ => None,
            })
            .flatten()
            .map(|e| e.id.clone())
            .collect();

        let mut scrubbing = false;
        for trigger in state.triggers.values_mut() {
            let Binding::Scrub(timeline) = &mut trigger.binding else {
                continue;
            };
            if intro_finished {
                // Hand the elements back to scroll
                timeline.invalidate();
            }
            scrubbing |= timeline.advance(
                &trigger.span,
                &frame,
                &mut *stage as &mut dyn AnimationTarget,
                &|id: &ElementId| owned.contains(id),
            );
        }
        drop(state);

        intro_running || scrubbing || self.transition.is_animating() || self.coordinator.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Length, Transform, VisualState};
    use crate::motion::Ease;
    use crate::timeline::{IntroTimeline, PinPhases, PinnedMotion, RevealBand, RevealGroup};

    const FRAME: Duration = Duration::from_millis(16);

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 100.0)
    }

    /// A pinned section with a staggered entrance and an exit
    fn pinned(id: &str) -> SectionDescriptor {
        let phases = PinPhases::default();
        let photo = PinnedMotion::new(format!("{id}.photo").as_str())
            .enter(VisualState::resting().x(Length::Vw(-60.0)).scale(0.96), 0.0)
            .exit(VisualState::resting().x(Length::Vw(-18.0)).opacity(0.0), 0.0)
            .build(phases)
            .unwrap();
        let text = PinnedMotion::new(format!("{id}.text").as_str())
            .enter(VisualState::hidden().y(Length::Vh(6.0)), 0.15)
            .exit(VisualState::hidden().y(Length::Vh(4.0)), 0.02)
            .build(phases)
            .unwrap();
        SectionDescriptor::pinned(id, 1.3)
            .element(photo)
            .element(text)
            .reset_on_leave_back(true)
    }

    fn three_pinned(config: EngineConfig) -> (ScrollEngine, Vec<SectionHandle>, Instant) {
        let mut engine = ScrollEngine::new(config, SnapConfig::default(), viewport());
        let now = Instant::now();
        let handles = engine
            .mount_all(&[pinned("one"), pinned("two"), pinned("three")], now)
            .unwrap();
        engine.tick(now);
        (engine, handles, now)
    }

    fn node(engine: &ScrollEngine, id: &str) -> Transform {
        engine.stage().get(&ElementId::from(id)).unwrap()
    }

    #[test]
    fn test_anchor_states_through_pin() {
        let (mut engine, _handles, now) = three_pinned(EngineConfig::exact());
        let vp = viewport();
        let span = engine.layout().pin_span(&SectionId::from("two")).unwrap();

        engine.scroll_to(span.start);
        engine.tick(now + FRAME);
        let from = VisualState::resting().x(Length::Vw(-60.0)).scale(0.96).resolve(&vp);
        assert!(node(&engine, "two.photo").approx_eq(&from, 1e-9));
        assert_eq!(node(&engine, "two.text").opacity, 0.0);

        engine.scroll_to(span.start + 0.3 * span.len());
        engine.tick(now + FRAME * 2);
        assert!(node(&engine, "two.photo").approx_eq(&Transform::IDENTITY, 1e-6));
        assert!(node(&engine, "two.text").approx_eq(&Transform::IDENTITY, 1e-6));

        engine.scroll_to(span.start + 0.5 * span.len());
        engine.tick(now + FRAME * 3);
        assert!(node(&engine, "two.photo").is_identity());

        engine.scroll_to(span.end);
        engine.tick(now + FRAME * 4);
        let to = VisualState::resting().x(Length::Vw(-18.0)).opacity(0.0).resolve(&vp);
        assert!(node(&engine, "two.photo").approx_eq(&to, 1e-9));
    }

    #[test]
    fn test_entrance_is_monotonic() {
        let (mut engine, _handles, now) = three_pinned(EngineConfig::exact());
        let span = engine.layout().pin_span(&SectionId::from("two")).unwrap();

        let mut last_x = f64::NEG_INFINITY;
        let mut last_opacity = f64::NEG_INFINITY;
        for i in 0..=30 {
            engine.scroll_to(span.start + span.len() * i as f64 / 100.0);
            engine.tick(now + FRAME * (i + 1));
            let photo = node(&engine, "two.photo");
            let text = node(&engine, "two.text");
            assert!(photo.x >= last_x);
            assert!(text.opacity >= last_opacity);
            assert!((0.0..=1.0).contains(&text.opacity));
            last_x = photo.x;
            last_opacity = text.opacity;
        }
    }

    #[test]
    fn test_reverse_scroll_resets_to_identity() {
        // Default config: playheads lag behind scroll
        let (mut engine, _handles, now) = three_pinned(EngineConfig::default());
        let span = engine.layout().pin_span(&SectionId::from("two")).unwrap();

        let mut t = now;
        engine.scroll_to(span.start + 0.9 * span.len());
        for _ in 0..200 {
            t += FRAME;
            engine.tick(t);
        }
        assert!(!node(&engine, "two.photo").is_identity());

        // Fling back to the top in one frame, before the playhead catches up
        engine.scroll_to(0.0);
        t += FRAME;
        engine.tick(t);
        assert_eq!(node(&engine, "two.photo"), Transform::IDENTITY);
        assert_eq!(node(&engine, "two.text"), Transform::IDENTITY);

        // And it stays there while scroll remains above the section
        for _ in 0..20 {
            t += FRAME;
            engine.tick(t);
        }
        assert_eq!(node(&engine, "two.photo"), Transform::IDENTITY);
    }

    #[test]
    fn test_three_pinned_ranges_are_ordered() {
        let (mut engine, _handles, _now) = three_pinned(EngineConfig::exact());
        // Three sections of 100% + 130% viewport height
        assert!((engine.layout().document_height() - 690.0).abs() < 1e-9);

        engine.install_snap();
        let ranges = engine.snap_ranges();
        assert_eq!(ranges.len(), 3);
        assert!(ranges[0].end() < ranges[1].start());
        assert!(ranges[1].end() < ranges[2].start());
        for range in &ranges {
            assert!(range.start() < range.center() && range.center() < range.end());
        }
    }

    #[test]
    fn test_snap_installs_after_settle_and_centers_gesture() {
        let (mut engine, _handles, now) = three_pinned(EngineConfig::exact());
        assert!(engine.snap_ranges().is_empty());

        let mut t = now + Duration::from_millis(500);
        engine.tick(t);
        let ranges = engine.snap_ranges();
        assert_eq!(ranges.len(), 3);

        let span = engine.layout().pin_span(&SectionId::from("two")).unwrap();
        engine.scroll_to(span.start + 10.0);
        let target = engine.end_gesture(t).unwrap();
        assert_eq!(target, ranges[1].center());

        while engine.is_transitioning() {
            t += FRAME;
            engine.tick(t);
        }
        assert!((engine.fraction() - ranges[1].center()).abs() < 1e-9);

        // Already centered: nothing more to do
        assert!(engine.end_gesture(t).is_none());
    }

    #[test]
    fn test_gesture_outside_pins_is_left_alone() {
        let mut engine = ScrollEngine::new(EngineConfig::exact(), SnapConfig::default(), viewport());
        let now = Instant::now();
        let reveal = RevealGroup::new(RevealBand::new(0.0, 0.8, 0.55), VisualState::hidden())
            .item("reviews.heading")
            .build()
            .unwrap();
        let _handles = engine
            .mount_all(
                &[pinned("hero"), SectionDescriptor::inline("reviews", 3.0).reveal(reveal)],
                now,
            )
            .unwrap();
        engine.install_snap();

        // Pin of the hero spans [0, 130] of 430
        engine.scroll_to(300.0);
        assert!(engine.end_gesture(now).is_none());
        assert_eq!(engine.scroll(), 300.0);
    }

    #[test]
    fn test_no_pinned_sections_means_no_rule() {
        let mut engine = ScrollEngine::new(EngineConfig::exact(), SnapConfig::default(), viewport());
        let now = Instant::now();
        let reveal = RevealGroup::new(RevealBand::new(0.0, 0.8, 0.55), VisualState::hidden())
            .item("order.heading")
            .build()
            .unwrap();
        let _handles = engine
            .mount_all(&[SectionDescriptor::inline("order", 2.0).reveal(reveal)], now)
            .unwrap();
        assert!(engine.install_snap().is_none());
        engine.scroll_to(42.0);
        assert!(engine.end_gesture(now).is_none());
    }

    #[test]
    fn test_released_section_is_never_touched() {
        let (mut engine, mut handles, now) = three_pinned(EngineConfig::exact());
        let span = engine.layout().pin_span(&SectionId::from("two")).unwrap();
        engine.scroll_to(span.start + 0.8 * span.len());
        engine.tick(now + FRAME);

        let two = handles.remove(1);
        assert_eq!(two.release(), 1);
        engine.tick(now + FRAME * 2);
        assert!(!engine.stage().contains(&ElementId::from("two.photo")));
        assert!(!engine.stage().contains(&ElementId::from("two.text")));

        let skipped = engine.stage().skipped();
        for i in 0..50 {
            engine.scroll_by(if i % 2 == 0 { 37.0 } else { -23.0 });
            engine.tick(now + FRAME * (i + 3));
        }
        assert_eq!(engine.stage().skipped(), skipped);
        assert!(!engine.stage().contains(&ElementId::from("two.photo")));
        assert_eq!(engine.registry().section_count(), 2);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let (mut engine, handles, now) = three_pinned(EngineConfig::exact());
        engine.install_snap();
        assert_eq!(engine.registry().len(), 4);

        assert_eq!(engine.teardown(), 4);
        assert!(engine.registry().is_empty());
        assert!(engine.stage().is_empty());

        engine.scroll_to(100.0);
        engine.tick(now + FRAME);
        assert_eq!(engine.stage().skipped(), 0);
        assert!(engine.end_gesture(now + FRAME).is_none());

        // Late handle drops find nothing left to release
        let released: usize = handles.into_iter().map(SectionHandle::release).sum();
        assert_eq!(released, 0);
    }

    #[test]
    fn test_resize_keeps_fraction_and_remeasures() {
        let (mut engine, _handles, now) = three_pinned(EngineConfig::exact());
        engine.install_snap();
        engine.scroll_to(295.0);
        let fraction = engine.fraction();
        let before = engine.snap_ranges();

        engine.resize(Viewport::new(1000.0, 50.0));
        assert!((engine.fraction() - fraction).abs() < 1e-9);
        assert!((engine.max_scroll() - 295.0).abs() < 1e-9);
        // Normalized ranges are viewport independent for equal pins
        let after = engine.snap_ranges();
        assert_eq!(after.len(), before.len());
        assert!((after[1].center() - before[1].center()).abs() < 1e-9);
        engine.tick(now + FRAME);
    }

    #[test]
    fn test_intro_owns_elements_until_done() {
        let mut engine = ScrollEngine::new(EngineConfig::exact(), SnapConfig::default(), viewport());
        let intro = IntroTimeline::builder()
            .tween("hero.headline", VisualState::hidden().y(Length::Px(40.0)), 0.0, 0.5, Ease::Power3Out)
            .build()
            .unwrap();
        let headline = PinnedMotion::new("hero.headline")
            .exit(VisualState::hidden().x(Length::Vw(-18.0)), 0.0)
            .build(PinPhases::default())
            .unwrap();
        let hero = SectionDescriptor::pinned("hero", 1.3)
            .element(headline)
            .intro(intro);
        let now = Instant::now();
        let _handles = engine.mount_all(&[hero, pinned("next")], now).unwrap();

        assert!(engine.tick(now));
        assert_eq!(node(&engine, "hero.headline").opacity, 0.0);

        engine.tick(now + Duration::from_millis(250));
        let mid = node(&engine, "hero.headline");
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);

        engine.tick(now + Duration::from_millis(600));
        assert!(node(&engine, "hero.headline").is_identity());

        // Scroll drives it again once the intro is over
        engine.scroll_to(130.0);
        engine.tick(now + Duration::from_millis(616));
        assert_eq!(node(&engine, "hero.headline").opacity, 0.0);
    }

    #[test]
    fn test_scroll_to_section() {
        let (mut engine, _handles, now) = three_pinned(EngineConfig::exact());
        assert!(engine
            .scroll_to_section(&SectionId::from("missing"), now)
            .is_err());

        engine.scroll_to_section(&SectionId::from("three"), now).unwrap();
        let mut t = now;
        while engine.is_transitioning() {
            t += FRAME;
            engine.tick(t);
        }
        assert_eq!(engine.scroll(), 460.0);
        assert!(engine.nav_state().is_dark());
    }

    #[test]
    fn test_remount_after_release() {
        let (mut engine, mut handles, now) = three_pinned(EngineConfig::exact());
        drop(handles.remove(2));
        let handle = engine.mount(&pinned("three")).unwrap();
        engine.tick(now + FRAME);
        assert!(engine.stage().contains(&ElementId::from("three.photo")));
        assert_eq!(handle.triggers().len(), 1);
    }
}
