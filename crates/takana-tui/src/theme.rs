//! Page palette and user color overrides

use ratatui::style::Color;
use takana_core::config::ThemeColorOverrides;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    /// Cards, panels and the dark nav bar
    pub card: Color,
    pub text: Color,
    pub muted: Color,
    /// Brand orange: headlines, buttons, stamps
    pub accent: Color,
    pub star: Color,
    /// Status line background
    pub status: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x0b, 0x0b, 0x0c),
            card: Color::Rgb(0x14, 0x14, 0x14),
            text: Color::Rgb(0xf4, 0xf4, 0xf4),
            muted: Color::Rgb(0xb8, 0xb8, 0xb8),
            accent: Color::Rgb(0xff, 0x6a, 0x00),
            star: Color::Rgb(0xff, 0xc1, 0x07),
            status: Color::Rgb(0x1f, 0x1f, 0x22),
        }
    }
}

impl Theme {
    /// Color `fg` seen at `opacity` over `bg`
    ///
    /// Terminals have no alpha, so partially transparent elements are drawn
    /// by mixing toward the color underneath. Non-RGB colors only survive
    /// at full opacity.
    pub fn fade(fg: Color, bg: Color, opacity: f64) -> Color {
        let t = opacity.clamp(0.0, 1.0);
        match (fg, bg) {
            (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => Color::Rgb(
                mix(fr, br, t),
                mix(fg_, bg_, t),
                mix(fb, bb, t),
            ),
            _ if t >= 1.0 => fg,
            _ => bg,
        }
    }
}

fn mix(fg: u8, bg: u8, t: f64) -> u8 {
    (bg as f64 + (fg as f64 - bg as f64) * t).round() as u8
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Build the page theme from config overrides
pub fn load_theme(overrides: &ThemeColorOverrides) -> Theme {
    let mut theme = Theme::default();
    let slots = [
        (&overrides.background, &mut theme.background),
        (&overrides.card, &mut theme.card),
        (&overrides.text, &mut theme.text),
        (&overrides.muted, &mut theme.muted),
        (&overrides.accent, &mut theme.accent),
        (&overrides.star, &mut theme.star),
    ];
    for (hex, slot) in slots {
        match hex.as_deref().map(|h| (h, parse_hex_color(h))) {
            Some((_, Some(color))) => *slot = color,
            Some((h, None)) => tracing::warn!("Ignoring invalid color override '{}'", h),
            None => {}
        }
    }
    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff6a00"), Some(Color::Rgb(255, 106, 0)));
        assert_eq!(parse_hex_color("FFF"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ThemeColorOverrides {
            accent: Some("#00ff00".to_string()),
            muted: Some("nope".to_string()),
            ..Default::default()
        };
        let theme = load_theme(&overrides);
        assert_eq!(theme.accent, Color::Rgb(0, 255, 0));
        assert_eq!(theme.muted, Theme::default().muted);
    }

    #[test]
    fn test_fade() {
        let bg = Color::Rgb(0, 0, 0);
        let fg = Color::Rgb(200, 100, 50);
        assert_eq!(Theme::fade(fg, bg, 1.0), fg);
        assert_eq!(Theme::fade(fg, bg, 0.0), bg);
        assert_eq!(Theme::fade(fg, bg, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(Theme::fade(Color::Red, bg, 0.4), bg);
    }
}
