use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use takana_core::snap::CoordinatorState;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let engine = &app.engine;

        let section = engine
            .layout()
            .section_at(engine.scroll())
            .map(|s| s.id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let progress = engine
            .layout()
            .section_at(engine.scroll())
            .and_then(|s| engine.progress(&s.id))
            .map(|p| format!(" {:.2}", p))
            .unwrap_or_default();

        let snap = match engine.coordinator().state() {
            _ if !engine.is_snap_enabled() => "off",
            CoordinatorState::Pending { .. } => "settling",
            CoordinatorState::Installed(_) => "on",
            CoordinatorState::NoRule => "none",
            CoordinatorState::Idle => "idle",
        };
        let motion = if engine.is_transitioning() {
            " | SNAPPING"
        } else if app.is_scrolling() {
            " | SCROLL"
        } else {
            ""
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else if let Some(link) = app.focused_link() {
            format!(" {} -> {}", link.label, link.url)
        } else {
            format!(
                " {:>3.0}% | {}{} | snap: {}{}",
                engine.fraction() * 100.0,
                section,
                progress,
                snap,
                motion
            )
        };

        let help_hint = " q:quit j/k:scroll m/r/o:jump tab:links s:snap d:ranges ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.text).bg(theme.status)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.status)),
            Span::styled(help_hint, Style::default().fg(theme.muted).bg(theme.status)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
