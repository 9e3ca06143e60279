use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use takana_core::PinnedRange;

use crate::app::App;

/// Pinned ranges, playheads and a scroll rail drawn over the page
pub struct RangeOverlayWidget;

impl RangeOverlayWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let engine = &app.engine;
        let ranges = engine.snap_ranges();
        let fraction = engine.fraction();

        Self::render_rail(frame, area, app, &ranges, fraction);

        let pinned: Vec<_> = engine
            .layout()
            .sections()
            .iter()
            .filter(|s| s.is_pinned())
            .collect();

        let mut lines = vec![Line::from(Span::styled(
            format!(
                "scroll {:.1}/{:.1}  fraction {:.3}",
                engine.scroll(),
                engine.max_scroll(),
                fraction
            ),
            Style::default().fg(theme.muted),
        ))];
        lines.push(Line::default());

        if ranges.is_empty() {
            lines.push(Line::from(Span::styled(
                "no snap rule installed",
                Style::default().fg(theme.muted),
            )));
        }
        for (section, range) in pinned.iter().zip(ranges.iter()) {
            let inside = range.within_tolerance(fraction, 0.0);
            let playhead = engine.progress(&section.id).unwrap_or(0.0);
            let style = if inside {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<8}", section.id.as_str()), style),
                Span::styled(
                    format!(
                        " {:.3}-{:.3}  c {:.3}  p {:.2}",
                        range.start(), range.end(), range.center(), playhead
                    ),
                    style,
                ),
            ]));
        }

        // Calculate popup size - top right corner, sized to content
        let popup_width = 46u16.min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup_area = Rect::new(
            area.right().saturating_sub(popup_width + 2),
            area.y + 1,
            popup_width,
            popup_height,
        );

        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .title(" Pinned ranges ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.card));
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    /// One-column rail on the right edge: ranges shaded, current position marked
    fn render_rail(frame: &mut Frame, area: Rect, app: &App, ranges: &[PinnedRange], fraction: f64) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let x = area.right() - 1;
        let rows = area.height as f64;
        let marker = rail_row(fraction, area.height);
        let buf = frame.buffer_mut();
        for row in 0..area.height {
            let at = (row as f64 + 0.5) / rows;
            let (symbol, color) = if row == marker {
                ("◆", theme.text)
            } else if ranges.iter().any(|r| at >= r.start() && at <= r.end()) {
                ("█", theme.accent)
            } else {
                ("│", theme.muted)
            };
            if let Some(cell) = buf.cell_mut((x, area.y + row)) {
                cell.set_symbol(symbol).set_fg(color);
            }
        }
    }
}

/// Rail row of a scroll fraction
fn rail_row(fraction: f64, height: u16) -> u16 {
    let last = height.saturating_sub(1);
    ((fraction.clamp(0.0, 1.0) * last as f64).round() as u16).min(last)
}
