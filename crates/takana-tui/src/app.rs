use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use takana_core::nav::NavLink;
use takana_core::site::{self, content::Link};
use takana_core::{AppConfig, ScrollEngine, SectionHandle, Viewport};
use tracing::{debug, info};

use crate::theme::Theme;

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Active color theme
    pub theme: Theme,
    /// Scroll engine driving every section
    pub engine: ScrollEngine,
    /// Mounted sections; dropping a handle unmounts its section
    handles: Vec<SectionHandle>,
    /// Outbound links, top to bottom
    links: Vec<Link>,
    /// Index into `links` of the focused link
    pub focused_link: Option<usize>,
    /// Draw pinned ranges and playheads over the page
    pub show_overlay: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    /// Time of the last direct scroll input of the current gesture
    last_scroll_input: Option<Instant>,
}

impl App {
    /// Mount the page into a fresh engine sized to `viewport`
    pub fn new(config: Arc<AppConfig>, theme: Theme, viewport: Viewport, now: Instant) -> Result<Self> {
        let mut engine = ScrollEngine::from_config(&config, viewport);
        let sections = site::page(&config.engine)?;
        let handles = engine.mount_all(&sections, now)?;
        info!(
            sections = handles.len(),
            rows = engine.layout().document_height(),
            "preview ready"
        );
        Ok(Self {
            config,
            theme,
            engine,
            handles,
            links: site::content::links(),
            focused_link: None,
            show_overlay: false,
            should_quit: false,
            status_message: None,
            pending_key: None,
            last_scroll_input: None,
        })
    }

    pub fn section_count(&self) -> usize {
        self.handles.len()
    }

    /// Scroll by `rows` as part of a user gesture
    pub fn scroll_rows(&mut self, rows: f64, now: Instant) {
        self.engine.scroll_by(rows);
        self.last_scroll_input = Some(now);
    }

    /// Jump to an absolute offset as part of a user gesture
    pub fn scroll_to(&mut self, scroll: f64, now: Instant) {
        self.engine.scroll_to(scroll);
        self.last_scroll_input = Some(now);
    }

    pub fn scroll_lines(&mut self, steps: i32, now: Instant) {
        let rows = steps as f64 * self.config.ui.scroll_lines as f64;
        self.scroll_rows(rows, now);
    }

    pub fn scroll_half_page_down(&mut self, now: Instant) {
        self.scroll_rows(self.viewport_height() / 2.0, now);
    }

    pub fn scroll_half_page_up(&mut self, now: Instant) {
        self.scroll_rows(-self.viewport_height() / 2.0, now);
    }

    pub fn scroll_page_down(&mut self, now: Instant) {
        self.scroll_rows(self.viewport_height(), now);
    }

    pub fn scroll_page_up(&mut self, now: Instant) {
        self.scroll_rows(-self.viewport_height(), now);
    }

    pub fn jump_to_top(&mut self, now: Instant) {
        self.scroll_to(0.0, now);
    }

    pub fn jump_to_bottom(&mut self, now: Instant) {
        self.scroll_to(self.engine.max_scroll(), now);
    }

    /// Smooth-scroll to a nav bar target
    pub fn goto(&mut self, link: NavLink, now: Instant) -> Result<()> {
        // A programmatic scroll is not a gesture; it must not snap afterwards
        self.last_scroll_input = None;
        self.engine.scroll_to_section(&link.section(), now)?;
        debug!(target = link.label(), "nav link");
        Ok(())
    }

    /// Whether the user is mid-gesture
    pub fn is_scrolling(&self) -> bool {
        self.last_scroll_input.is_some()
    }

    /// Advance the engine one frame; returns true while anything still moves
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_scroll_input {
            if now.saturating_duration_since(last) >= self.config.ui.gesture_end() {
                self.last_scroll_input = None;
                if let Some(target) = self.engine.end_gesture(now) {
                    debug!(target, "gesture ended inside a pinned range");
                }
            }
        }
        let moving = self.engine.tick(now);
        moving || self.last_scroll_input.is_some()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.engine
            .resize(Viewport::new(width as f64, height as f64));
    }

    pub fn viewport_height(&self) -> f64 {
        self.engine.viewport().height
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn focused_link(&self) -> Option<&Link> {
        self.focused_link.and_then(|i| self.links.get(i))
    }

    pub fn next_link(&mut self) {
        if self.links.is_empty() {
            return;
        }
        self.focused_link = Some(match self.focused_link {
            Some(i) => (i + 1) % self.links.len(),
            None => 0,
        });
    }

    pub fn prev_link(&mut self) {
        if self.links.is_empty() {
            return;
        }
        let last = self.links.len() - 1;
        self.focused_link = Some(match self.focused_link {
            Some(0) | None => last,
            Some(i) => i - 1,
        });
    }

    pub fn toggle_snap(&mut self) {
        let enabled = !self.engine.is_snap_enabled();
        self.engine.set_snap_enabled(enabled);
        self.set_status(if enabled { "Snap on" } else { "Snap off" });
    }

    pub fn toggle_overlay(&mut self) {
        self.show_overlay = !self.show_overlay;
    }

    /// Leave link focus and overlays
    pub fn exit_mode(&mut self) {
        self.focused_link = None;
        self.show_overlay = false;
        self.clear_status();
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Clear pending key sequence
    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    /// Unmount every section
    pub fn shutdown(&mut self) {
        let released = self.engine.teardown();
        self.handles.clear();
        debug!(released, "preview closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app() -> (App, Instant) {
        let now = Instant::now();
        let app = App::new(
            Arc::new(AppConfig::default()),
            Theme::default(),
            Viewport::new(120.0, 40.0),
            now,
        )
        .unwrap();
        (app, now)
    }

    #[test]
    fn test_mounts_whole_page() {
        let (app, _) = app();
        assert_eq!(app.section_count(), 7);
        assert!(app.engine.max_scroll() > 0.0);
        assert_eq!(app.links().len(), 6);
    }

    #[test]
    fn test_gesture_ends_after_quiet_period() {
        let (mut app, now) = app();
        app.tick(now);
        app.scroll_lines(3, now);
        assert!(app.is_scrolling());
        assert!(app.tick(now + Duration::from_millis(50)));
        assert!(app.is_scrolling());
        app.tick(now + Duration::from_millis(200));
        assert!(!app.is_scrolling());
    }

    #[test]
    fn test_scroll_clamps() {
        let (mut app, now) = app();
        app.scroll_page_up(now);
        assert_eq!(app.engine.scroll(), 0.0);
        app.jump_to_bottom(now);
        assert_eq!(app.engine.scroll(), app.engine.max_scroll());
        app.scroll_page_down(now);
        assert_eq!(app.engine.scroll(), app.engine.max_scroll());
    }

    #[test]
    fn test_goto_is_not_a_gesture() {
        let (mut app, now) = app();
        app.scroll_lines(1, now);
        app.goto(NavLink::Order, now).unwrap();
        assert!(!app.is_scrolling());
        assert!(app.engine.is_transitioning());
    }

    #[test]
    fn test_link_focus_wraps() {
        let (mut app, _) = app();
        app.prev_link();
        assert_eq!(app.focused_link, Some(5));
        app.next_link();
        assert_eq!(app.focused_link, Some(0));
        assert_eq!(app.focused_link().map(|l| l.label), Some("Get Directions"));
        app.exit_mode();
        assert!(app.focused_link().is_none());
    }

    #[test]
    fn test_toggle_snap() {
        let (mut app, _) = app();
        assert!(app.engine.is_snap_enabled());
        app.toggle_snap();
        assert!(!app.engine.is_snap_enabled());
        assert_eq!(app.status_message.as_deref(), Some("Snap off"));
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let (mut app, _) = app();
        app.shutdown();
        assert_eq!(app.section_count(), 0);
        assert!(app.engine.registry().is_empty());
        assert!(app.engine.stage().is_empty());
    }
}
