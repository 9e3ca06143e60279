//! Key notation parsing and the runtime key → action table
//!
//! Bindings use Vim notation: plain characters (`j`, `G`, `/`), bracketed
//! keys with optional modifier prefixes (`<C-d>`, `<S-Tab>`, `<A-x>`,
//! `<C-S-F5>`), and doubled characters for two-key sequences (`gg`).

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use takana_core::config::KeymapConfig;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// The character, if this binding is one with no modifier besides Shift
    fn plain_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.difference(KeyModifiers::SHIFT).is_empty() => Some(c),
            _ => None,
        }
    }
}

/// A parsed entry from the `[keymap]` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    Single(KeyBinding),
    /// The same character pressed twice
    Double(char),
}

/// Runtime keymap
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Actions completed by pressing the keyed character twice
    doubles: HashMap<char, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let table: [(&str, Action); 17] = [
            (config.quit.as_str(), Action::Quit),
            (config.scroll_down.as_str(), Action::ScrollDown),
            (config.scroll_up.as_str(), Action::ScrollUp),
            (config.scroll_half_down.as_str(), Action::ScrollHalfPageDown),
            (config.scroll_half_up.as_str(), Action::ScrollHalfPageUp),
            (config.scroll_page_down.as_str(), Action::ScrollPageDown),
            (config.scroll_page_up.as_str(), Action::ScrollPageUp),
            (config.jump_to_top.as_str(), Action::JumpToTop),
            (config.jump_to_bottom.as_str(), Action::JumpToBottom),
            (config.goto_menu.as_str(), Action::GotoMenu),
            (config.goto_reviews.as_str(), Action::GotoReviews),
            (config.goto_order.as_str(), Action::GotoOrder),
            (config.next_link.as_str(), Action::NextLink),
            (config.prev_link.as_str(), Action::PrevLink),
            (config.open_link.as_str(), Action::OpenLink),
            (config.toggle_snap.as_str(), Action::ToggleSnap),
            (config.toggle_overlay.as_str(), Action::ToggleOverlay),
        ];

        let mut keymap = Self {
            bindings: HashMap::new(),
            doubles: HashMap::new(),
        };
        for (notation, action) in table {
            match parse_key_spec(notation) {
                Some(parsed) => keymap.bind(parsed, action, notation),
                None => warn!(key = notation, ?action, "unrecognized key notation, binding skipped"),
            }
        }

        keymap
            .bindings
            .insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        keymap
            .bindings
            .insert(KeyBinding::simple(KeyCode::Esc), Action::ExitMode);
        for (code, action) in [
            (KeyCode::Down, Action::ScrollDown),
            (KeyCode::Up, Action::ScrollUp),
            (KeyCode::PageDown, Action::ScrollPageDown),
            (KeyCode::PageUp, Action::ScrollPageUp),
            (KeyCode::Home, Action::JumpToTop),
            (KeyCode::End, Action::JumpToBottom),
        ] {
            keymap
                .bindings
                .entry(KeyBinding::simple(code))
                .or_insert(action);
        }
        keymap
    }

    /// First binding wins; later duplicates are reported and dropped
    fn bind(&mut self, key: KeySpec, action: Action, notation: &str) {
        let existing = match key {
            KeySpec::Single(binding) => self.bindings.get(&binding).copied(),
            KeySpec::Double(c) => self.doubles.get(&c).copied(),
        };
        if let Some(existing) = existing {
            warn!(key = notation, ?existing, ?action, "key already bound, ignoring");
            return;
        }
        match key {
            KeySpec::Single(binding) => {
                self.bindings.insert(binding, action);
            }
            KeySpec::Double(c) => {
                self.doubles.insert(c, action);
            }
        }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<Action> {
        self.bindings.get(binding).copied()
    }

    /// Action completed by pressing `binding` a second time, if it starts a
    /// two-key sequence
    pub fn double(&self, binding: &KeyBinding) -> Option<Action> {
        binding.plain_char().and_then(|c| self.doubles.get(&c).copied())
    }
}

/// Parse one `[keymap]` value
pub fn parse_key_spec(s: &str) -> Option<KeySpec> {
    let s = s.trim();
    let mut chars = s.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) if a == b && a != '<' => Some(KeySpec::Double(a)),
        _ => parse_key_binding(s).map(KeySpec::Single),
    }
}

/// Parse a single key in Vim notation
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        return parse_bracketed(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(if c.is_ascii_uppercase() {
        KeyBinding::shift(KeyCode::Char(c))
    } else {
        KeyBinding::simple(KeyCode::Char(c))
    })
}

/// `C-`, `S-` and `A-`/`M-` prefixes in any order, then a key name
fn parse_bracketed(inner: &str) -> Option<KeyBinding> {
    let mut modifiers = KeyModifiers::NONE;
    let mut rest = inner;
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        modifiers |= match rest.as_bytes()[0].to_ascii_uppercase() {
            b'C' => KeyModifiers::CONTROL,
            b'S' => KeyModifiers::SHIFT,
            b'A' | b'M' => KeyModifiers::ALT,
            _ => return None,
        };
        rest = &rest[2..];
    }

    let mut code = key_name(rest)?;
    if modifiers.contains(KeyModifiers::SHIFT) {
        code = match code {
            // Terminals report Shift+Tab as BackTab
            KeyCode::Tab => KeyCode::BackTab,
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_uppercase()),
            other => other,
        };
    }
    Some(KeyBinding::new(code, modifiers))
}

fn key_name(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" | "spc" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "lt" => KeyCode::Char('<'),
        _ => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=24).contains(&n).then_some(KeyCode::F(n));
            }
            let mut chars = name.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c.to_ascii_lowercase())
        }
    };
    Some(code)
}
