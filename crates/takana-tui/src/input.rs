use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    /// First key of a two-key sequence, waiting for the second
    Pending(char),
    GotoMenu,
    GotoReviews,
    GotoOrder,
    NextLink,
    PrevLink,
    OpenLink,
    ToggleSnap,
    ToggleOverlay,
    ExitMode,
    None,
}

impl Action {
    /// Actions that move the page directly and therefore start a gesture
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            Action::ScrollDown
                | Action::ScrollUp
                | Action::ScrollHalfPageDown
                | Action::ScrollHalfPageUp
                | Action::ScrollPageDown
                | Action::ScrollPageUp
                | Action::JumpToTop
                | Action::JumpToBottom
        )
    }
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    let binding = KeyBinding::new(key.code, normalize_modifiers(key));

    if let (Some(action), KeyCode::Char(c)) = (keymap.double(&binding), key.code) {
        return if app.pending_key == Some(c) {
            action
        } else {
            Action::Pending(c)
        };
    }

    keymap.get(&binding).unwrap_or(Action::None)
}

/// Uppercase letters arrive with SHIFT on some terminals and without it on
/// others; bindings store them with SHIFT.
fn normalize_modifiers(key: KeyEvent) -> KeyModifiers {
    match key.code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => key.modifiers | KeyModifiers::SHIFT,
        KeyCode::BackTab => key.modifiers | KeyModifiers::SHIFT,
        _ => key.modifiers,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use takana_core::{AppConfig, Viewport};

    use super::*;
    use crate::theme::Theme;

    fn app() -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Theme::default(),
            Viewport::new(80.0, 24.0),
            Instant::now(),
        )
        .unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_gg_needs_two_presses() {
        let keymap = Keymap::default();
        let mut app = app();
        let g = press(KeyCode::Char('g'));

        assert_eq!(handle_key_event(g, &app, &keymap), Action::Pending('g'));
        app.pending_key = Some('g');
        assert_eq!(handle_key_event(g, &app, &keymap), Action::JumpToTop);
    }

    #[test]
    fn test_uppercase_without_shift_flag() {
        let keymap = Keymap::default();
        let app = app();
        assert_eq!(
            handle_key_event(press(KeyCode::Char('G')), &app, &keymap),
            Action::JumpToBottom
        );
        assert_eq!(
            handle_key_event(press(KeyCode::BackTab), &app, &keymap),
            Action::PrevLink
        );
        assert_eq!(handle_key_event(press(KeyCode::Char('x')), &app, &keymap), Action::None);
    }
}
