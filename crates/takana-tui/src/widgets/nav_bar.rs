use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use takana_core::nav::{NavLink, NavStyle};
use takana_core::site::content;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

/// Sticky bar over the first row of the page
pub struct NavBarWidget;

impl NavBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let nav = app.engine.nav_state();
        let keys = &app.config.keymap;

        let base = match nav.style {
            NavStyle::Dark => Style::default().bg(theme.card),
            // Transparent: text only, the page shows through
            NavStyle::Clear => Style::default(),
        };

        let brand = format!(" {} ", content::BRAND);
        let mut links = Vec::new();
        for (link, key) in NavLink::ALL
            .iter()
            .zip([&keys.goto_menu, &keys.goto_reviews, &keys.goto_order])
        {
            links.push(Span::styled(format!("{} ", link.label()), base.fg(theme.text)));
            links.push(Span::styled(format!("[{}]  ", key), base.fg(theme.muted)));
        }
        let links_width: usize = links.iter().map(|s| s.content.width()).sum();
        let padding = (area.width as usize).saturating_sub(brand.width() + links_width);

        let mut spans = vec![
            Span::styled(
                brand,
                base.fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ".repeat(padding), base),
        ];
        spans.extend(links);

        let mut paragraph = Paragraph::new(Line::from(spans));
        if nav.is_dark() {
            paragraph = paragraph.style(base);
        }
        frame.render_widget(paragraph, area);
    }
}
