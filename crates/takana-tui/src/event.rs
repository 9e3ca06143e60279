use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};
use tokio::sync::mpsc;
use tracing::warn;

/// How often the reader checks whether the handler is still listening
const READER_POLL: Duration = Duration::from_millis(50);

/// Event handler for terminal events
///
/// A blocking reader task forwards terminal input over a channel; the frame
/// clock is the timeout on that channel, so an idle terminal yields `Tick`
/// once per interval.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tick_rate: Duration,
    /// Interval while timelines or a snap transition are moving
    frame_duration: Duration,
}

impl EventHandler {
    /// Start reading terminal input; must be called inside a tokio runtime
    pub fn new(tick_rate: Duration, frame_duration: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || read_terminal(tx));
        Self::with_receiver(rx, tick_rate, frame_duration)
    }

    fn with_receiver(rx: mpsc::UnboundedReceiver<AppEvent>, tick_rate: Duration, frame_duration: Duration) -> Self {
        Self {
            rx,
            tick_rate,
            frame_duration: frame_duration.min(tick_rate),
        }
    }

    /// Next event, or `Tick` after the idle tick rate
    pub async fn next(&mut self) -> Result<AppEvent> {
        self.wait(self.tick_rate).await
    }

    /// Next event, or `Tick` after one animation frame
    pub async fn next_animation(&mut self) -> Result<AppEvent> {
        self.wait(self.frame_duration).await
    }

    async fn wait(&mut self, interval: Duration) -> Result<AppEvent> {
        match tokio::time::timeout(interval, self.rx.recv()).await {
            Err(_) => Ok(AppEvent::Tick),
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(anyhow!("terminal input closed")),
        }
    }
}

/// Runs until the handler is dropped or the terminal fails
fn read_terminal(tx: mpsc::UnboundedSender<AppEvent>) {
    while !tx.is_closed() {
        let ready = match event::poll(READER_POLL) {
            Ok(ready) => ready,
            Err(e) => {
                warn!("Terminal poll failed: {}", e);
                return;
            }
        };
        if !ready {
            continue;
        }
        match event::read() {
            Ok(raw) => {
                if let Some(event) = map_event(raw) {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Terminal read failed: {}", e);
                return;
            }
        }
    }
}

fn map_event(event: Event) -> Option<AppEvent> {
    match event {
        // Only handle key press events, ignore release events
        // (crossterm 0.27+ sends release events on some systems)
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(AppEvent::Wheel(1)),
            MouseEventKind::ScrollUp => Some(AppEvent::Wheel(-1)),
            _ => None,
        },
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Application events
#[derive(Debug, PartialEq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse wheel notch; positive scrolls down
    Wheel(i8),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent};

    fn handler() -> (mpsc::UnboundedSender<AppEvent>, EventHandler) {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = EventHandler::with_receiver(rx, Duration::from_millis(40), Duration::from_millis(5));
        (tx, events)
    }

    #[test]
    fn test_map_event_filters_releases_and_clicks() {
        let press = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(map_event(Event::Key(press)), Some(AppEvent::Key(press)));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert_eq!(map_event(Event::Key(release)), None);

        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(map_event(Event::Mouse(wheel(MouseEventKind::ScrollUp))), Some(AppEvent::Wheel(-1)));
        assert_eq!(map_event(Event::Mouse(wheel(MouseEventKind::Moved))), None);
        assert_eq!(map_event(Event::Resize(80, 24)), Some(AppEvent::Resize(80, 24)));
    }

    #[tokio::test]
    async fn test_queued_input_comes_before_tick() {
        let (tx, mut events) = handler();
        tx.send(AppEvent::Wheel(1)).unwrap();
        assert_eq!(events.next().await.unwrap(), AppEvent::Wheel(1));
        assert_eq!(events.next_animation().await.unwrap(), AppEvent::Tick);
    }

    #[tokio::test]
    async fn test_closed_input_is_an_error() {
        let (tx, mut events) = handler();
        drop(tx);
        assert!(events.next().await.is_err());
    }

    #[test]
    fn test_frame_interval_never_exceeds_tick_rate() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let events = EventHandler::with_receiver(rx, Duration::from_millis(100), Duration::from_millis(250));
        assert_eq!(events.frame_duration, Duration::from_millis(100));
    }
}
