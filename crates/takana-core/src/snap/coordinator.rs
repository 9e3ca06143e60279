use std::time::Instant;

use tracing::{debug, info};

use crate::config::SnapConfig;
use crate::layout::PageLayout;
use crate::registry::{Binding, Measure, TriggerId, TriggerRegistry};
use crate::snap::rule::SnapRule;

/// Lifecycle of the page-wide snap rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Nothing scheduled
    Idle,
    /// Waiting for sections to finish registering
    Pending { deadline: Instant },
    /// Rule registered under this trigger
    Installed(TriggerId),
    /// Measured, but there was nothing to snap to
    NoRule,
}

/// Installs one snap rule after sections mount and keeps it current
///
/// The rule itself lives in the trigger registry, so tearing the registry
/// down releases it along with every section trigger.
#[derive(Debug, Clone)]
pub struct SnapCoordinator {
    config: SnapConfig,
    state: CoordinatorState,
}

impl SnapCoordinator {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            state: CoordinatorState::Idle,
        }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, CoordinatorState::Pending { .. })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Defer measuring until the settle delay has passed
    pub fn schedule(&mut self, now: Instant, registry: &TriggerRegistry) {
        if !self.config.enabled {
            return;
        }
        self.uninstall(registry);
        self.state = CoordinatorState::Pending {
            deadline: now + self.config.settle_delay(),
        };
    }

    /// Install the rule once the deadline has passed; returns true on the frame it happens
    pub fn poll(&mut self, now: Instant, registry: &TriggerRegistry, layout: &PageLayout) -> bool {
        match self.state {
            CoordinatorState::Pending { deadline } if now >= deadline => {
                self.install(registry, layout);
                true
            }
            _ => false,
        }
    }

    /// Measure pinned ranges now and install the rule, replacing any previous one
    pub fn install(&mut self, registry: &TriggerRegistry, layout: &PageLayout) -> Option<TriggerId> {
        self.uninstall(registry);

        let spans = registry.pinned_spans();
        let pinned = spans.len();
        match SnapRule::from_spans(spans, layout.max_scroll(), self.config.tolerance) {
            Some(rule) => {
                let ranges = rule.ranges().len();
                let id = registry.register(Measure::Document, Binding::Snap(rule));
                info!(ranges, trigger = %id, "snap rule installed");
                self.state = CoordinatorState::Installed(id);
                Some(id)
            }
            None => {
                debug!(pinned, max_scroll = layout.max_scroll(), "nothing to snap to");
                self.state = CoordinatorState::NoRule;
                None
            }
        }
    }

    /// Re-measure after a layout change, if a rule has been measured before
    pub fn recompute(&mut self, registry: &TriggerRegistry, layout: &PageLayout) {
        if !self.config.enabled || !self.config.recompute_on_resize {
            return;
        }
        if matches!(self.state, CoordinatorState::Installed(_) | CoordinatorState::NoRule) {
            self.install(registry, layout);
        }
    }

    /// The fraction a gesture ending at `fraction` should settle at
    pub fn snap_target(&self, registry: &TriggerRegistry, fraction: f64) -> f64 {
        self.rule(registry)
            .map(|rule| rule.snap(fraction))
            .unwrap_or(fraction)
    }

    pub fn rule(&self, registry: &TriggerRegistry) -> Option<SnapRule> {
        match self.state {
            CoordinatorState::Installed(id) => registry.snap_rule(id),
            _ => None,
        }
    }

    /// Turn snapping on or off; enabling measures straight away
    pub fn set_enabled(&mut self, enabled: bool, registry: &TriggerRegistry, layout: &PageLayout) {
        self.config.enabled = enabled;
        if enabled {
            self.install(registry, layout);
        } else {
            self.uninstall(registry);
            self.state = CoordinatorState::Idle;
        }
    }

    /// Release the installed rule, if any
    pub fn uninstall(&mut self, registry: &TriggerRegistry) {
        if let CoordinatorState::Installed(id) = self.state {
            registry.release(id);
        }
        self.state = CoordinatorState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::EngineConfig;
    use crate::geometry::{Viewport, VisualState};
    use crate::section::SectionDescriptor;
    use crate::registry::SectionHandle;
    use crate::timeline::{PinPhases, PinnedMotion};

    fn mount_pinned(registry: &TriggerRegistry, ids: &[&str]) -> (Vec<SectionHandle>, PageLayout) {
        let config = EngineConfig::default();
        let handles = ids
            .iter()
            .map(|id| {
                let element = PinnedMotion::new(format!("{id}.photo").as_str())
                    .enter(VisualState::hidden(), 0.0)
                    .build(PinPhases::default())
                    .unwrap();
                registry
                    .mount(&SectionDescriptor::pinned(*id, 1.3).element(element), &config)
                    .unwrap()
            })
            .collect();
        let layout = registry.measure(Viewport::new(100.0, 100.0));
        registry.refresh(&layout);
        (handles, layout)
    }

    #[test]
    fn test_installs_after_settle_delay() {
        let registry = TriggerRegistry::new();
        let (_handles, layout) = mount_pinned(&registry, &["one", "two", "three"]);
        let mut coordinator = SnapCoordinator::new(SnapConfig::default());
        let now = Instant::now();

        coordinator.schedule(now, &registry);
        assert!(!coordinator.poll(now + Duration::from_millis(499), &registry, &layout));
        assert!(coordinator.is_pending());

        assert!(coordinator.poll(now + Duration::from_millis(500), &registry, &layout));
        let rule = coordinator.rule(&registry).unwrap();
        assert_eq!(rule.ranges().len(), 3);
        // Three pins plus the snap trigger
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_no_pins_installs_nothing() {
        let registry = TriggerRegistry::new();
        let layout = registry.measure(Viewport::new(100.0, 100.0));
        let mut coordinator = SnapCoordinator::new(SnapConfig::default());
        assert!(coordinator.install(&registry, &layout).is_none());
        assert_eq!(coordinator.state(), CoordinatorState::NoRule);
        assert_eq!(coordinator.snap_target(&registry, 0.37), 0.37);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reinstall_replaces_rule() {
        let registry = TriggerRegistry::new();
        let (_handles, layout) = mount_pinned(&registry, &["one", "two"]);
        let mut coordinator = SnapCoordinator::new(SnapConfig::default());
        let first = coordinator.install(&registry, &layout).unwrap();
        coordinator.recompute(&registry, &layout);
        assert!(!registry.contains(first));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_disable_releases_rule() {
        let registry = TriggerRegistry::new();
        let (_handles, layout) = mount_pinned(&registry, &["one", "two"]);
        let mut coordinator = SnapCoordinator::new(SnapConfig::default());
        coordinator.install(&registry, &layout);
        coordinator.set_enabled(false, &registry, &layout);
        assert_eq!(registry.len(), 2);
        assert_eq!(coordinator.snap_target(&registry, 0.1), 0.1);

        // Scheduling while disabled stays idle
        coordinator.schedule(Instant::now(), &registry);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
    }
}
