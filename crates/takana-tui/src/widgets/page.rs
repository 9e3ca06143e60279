//! Draws the page at the engine's current scroll offset
//!
//! Section rectangles come from the engine layout; boxes inside them are
//! offset, scaled and faded by the transform the engine last wrote for their
//! element. Rotation has no cell representation and is not drawn.

use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    Frame,
};
use takana_core::{ElementId, Stage, Transform};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::scene::{self, Fill, Node, TextLine, Tone};
use crate::app::App;
use crate::theme::Theme;

pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let now = Local::now().naive_local();
        Self::render_at(frame.buffer_mut(), area, app, now);
    }

    /// Render with an explicit wall clock
    pub fn render_at(buf: &mut Buffer, area: Rect, app: &App, now: NaiveDateTime) {
        let theme = &app.theme;
        fill(buf, area, area_box(area), theme.background);

        let scroll = app.engine.scroll();
        let layout = app.engine.layout();
        for section in layout.visible_sections(scroll) {
            let bounds = Bounds {
                x: area.x as f64,
                y: area.y as f64 + section.screen_top(scroll),
                w: area.width as f64,
                h: section.height,
            };
            let painter = Painter {
                area,
                theme,
                stage: app.engine.stage(),
                focused_link: app.focused_link,
            };
            painter.section(buf, bounds, &scene::nodes(section.id.as_str(), now));
        }
    }
}

/// Rectangle in fractional cells; may extend past the drawing area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    /// Place a box inside these bounds and apply its transform
    pub fn project(&self, node: &Node, t: &Transform) -> Bounds {
        let p = node.place;
        let (w, h) = (self.w * p.w * t.scale, self.h * p.h * t.scale);
        let cx = self.x + self.w * (p.x + p.w / 2.0) + t.x;
        let cy = self.y + self.h * (p.y + p.h / 2.0) + t.y;
        Bounds {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    fn cells(&self) -> CellBox {
        let left = self.x.round() as i32;
        let top = self.y.round() as i32;
        CellBox {
            left,
            top,
            right: (self.x + self.w).round() as i32,
            bottom: (self.y + self.h).round() as i32,
        }
    }
}

/// Half-open cell rectangle in signed coordinates
#[derive(Debug, Clone, Copy)]
struct CellBox {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl CellBox {
    fn width(&self) -> usize {
        (self.right - self.left).max(0) as usize
    }

    fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }
}

fn area_box(area: Rect) -> CellBox {
    CellBox {
        left: area.x as i32,
        top: area.y as i32,
        right: area.right() as i32,
        bottom: area.bottom() as i32,
    }
}

/// Child transform seen through its container
pub fn compose(parent: &Transform, child: &Transform) -> Transform {
    Transform {
        x: parent.x + child.x * parent.scale,
        y: parent.y + child.y * parent.scale,
        scale: parent.scale * child.scale,
        rotate: parent.rotate + child.rotate,
        opacity: parent.visible_opacity() * child.visible_opacity(),
    }
}

struct Painter<'a> {
    area: Rect,
    theme: &'a Theme,
    stage: &'a Stage,
    focused_link: Option<usize>,
}

impl Painter<'_> {
    fn transform(&self, id: &str) -> Transform {
        self.stage
            .get(&ElementId::from(id))
            .unwrap_or(Transform::IDENTITY)
    }

    fn section(&self, buf: &mut Buffer, bounds: Bounds, nodes: &[Node]) {
        let mut resolved: HashMap<&str, (Transform, Color)> = HashMap::new();
        for node in nodes {
            let own = self.transform(&node.id);
            let (t, behind) = match node.parent.as_deref().and_then(|p| resolved.get(p)) {
                Some((parent, under)) => (compose(parent, &own), *under),
                None => (own, self.theme.background),
            };
            let surface = self.fill_color(node.fill).unwrap_or(behind);
            resolved.insert(node.id.as_str(), (t, Theme::fade(surface, behind, t.visible_opacity())));

            if t.is_visible() {
                self.node(buf, bounds.project(node, &t), node, &t, behind);
            }
        }
    }

    fn fill_color(&self, fill: Fill) -> Option<Color> {
        match fill {
            Fill::None => None,
            Fill::Card => Some(self.theme.card),
            Fill::Accent => Some(self.theme.accent),
            Fill::Photo => Some(Theme::fade(self.theme.accent, self.theme.background, 0.16)),
        }
    }

    fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Text => self.theme.text,
            Tone::Muted => self.theme.muted,
            Tone::Accent => self.theme.accent,
            Tone::Star => self.theme.star,
            Tone::Inverse => self.theme.background,
        }
    }

    fn node(&self, buf: &mut Buffer, bounds: Bounds, node: &Node, t: &Transform, behind: Color) {
        let cells = bounds.cells();
        let opacity = t.visible_opacity();
        let bg = match self.fill_color(node.fill) {
            Some(color) => {
                let color = Theme::fade(color, behind, opacity);
                fill(buf, self.area, cells, color);
                color
            }
            None => behind,
        };
        if node.lines.is_empty() {
            return;
        }

        let padding = if node.fill == Fill::None || cells.width() < 6 { 0 } else { 2 };
        let inner = CellBox {
            left: cells.left + padding,
            right: cells.right - padding,
            ..cells
        };
        let rows = layout_lines(&node.lines, inner.width());
        let top = cells.top + (cells.height() - rows.len() as i32).max(0) / 2;

        for (i, (line, text)) in rows.iter().enumerate() {
            let y = top + i as i32;
            if y >= cells.bottom {
                break;
            }
            let focused = line.link.is_some() && line.link == self.focused_link;
            // Unfilled boxes keep whatever is painted underneath
            let mut style = Style::default().fg(Theme::fade(self.tone_color(line.tone), bg, opacity));
            if node.fill != Fill::None {
                style = style.bg(bg);
            }
            if line.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if line.link.is_some() {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let width = text.width() as i32;
            let x = match node.align {
                Alignment::Center => inner.left + (inner.width() as i32 - width).max(0) / 2,
                Alignment::Right => inner.right - width,
                Alignment::Left => inner.left,
            };
            put_str(buf, self.area, x, y, text, inner.right, style);

            if let Some(trailer) = &line.trailer {
                let x = inner.right - trailer.width() as i32;
                if x > inner.left + width {
                    put_str(buf, self.area, x, y, trailer, inner.right, style);
                }
            }
        }
    }
}

/// Break lines to `width`, keeping each row's source line for styling
fn layout_lines(lines: &[TextLine], width: usize) -> Vec<(&TextLine, String)> {
    let mut rows = Vec::new();
    for line in lines {
        if line.wrap && line.text.width() > width && width > 0 {
            rows.extend(wrap(&line.text, width).into_iter().map(|r| (line, r)));
        } else {
            rows.push((line, line.text.clone()));
        }
    }
    rows
}

/// Greedy word wrap on display width
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn fill(buf: &mut Buffer, area: Rect, cells: CellBox, color: Color) {
    let clip = area_box(area);
    for y in cells.top.max(clip.top)..cells.bottom.min(clip.bottom) {
        for x in cells.left.max(clip.left)..cells.right.min(clip.right) {
            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                cell.set_symbol(" ").set_bg(color);
            }
        }
    }
}

/// Write `text` starting at column `x`, clipped to `area` and to `limit`
fn put_str(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, limit: i32, style: Style) {
    let clip = area_box(area);
    if y < clip.top || y >= clip.bottom {
        return;
    }
    let right = limit.min(clip.right);
    let mut col = x;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as i32;
        if w == 0 {
            continue;
        }
        if col + w > right {
            break;
        }
        if col >= clip.left {
            if let Some(cell) = buf.cell_mut((col as u16, y as u16)) {
                cell.set_char(ch).set_style(style);
            }
        }
        col += w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use chrono::NaiveDate;
    use takana_core::{AppConfig, Viewport};

    fn node(x: f64, y: f64, w: f64, h: f64) -> Node {
        scene::nodes("hero", noon())
            .into_iter()
            .next()
            .map(|mut n| {
                n.place = scene::Place { x, y, w, h };
                n
            })
            .unwrap()
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_project_applies_offset_and_scale() {
        let section = Bounds { x: 0.0, y: 10.0, w: 100.0, h: 40.0 };
        let n = node(0.1, 0.25, 0.2, 0.5);
        let at_rest = section.project(&n, &Transform::IDENTITY);
        assert_eq!(at_rest, Bounds { x: 10.0, y: 20.0, w: 20.0, h: 20.0 });

        let moved = section.project(
            &n,
            &Transform {
                x: -5.0,
                scale: 0.5,
                ..Transform::IDENTITY
            },
        );
        assert_eq!(moved, Bounds { x: 10.0, y: 25.0, w: 10.0, h: 10.0 });
    }

    #[test]
    fn test_compose() {
        let parent = Transform {
            x: 10.0,
            scale: 0.5,
            opacity: 0.5,
            ..Transform::IDENTITY
        };
        let child = Transform {
            x: 4.0,
            opacity: 0.5,
            ..Transform::IDENTITY
        };
        let t = compose(&parent, &child);
        assert_eq!(t.x, 12.0);
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.opacity, 0.25);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("unbreakable", 4), vec!["unbreakable"]);
        assert!(wrap("", 4).is_empty());
    }

    #[test]
    fn test_put_str_clips_left_and_right() {
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        put_str(&mut buf, area, -2, 0, "abcdefgh", 5, Style::default());
        let row: String = (0..5u16).map(|x| buf[(x, 0u16)].symbol().to_string()).collect();
        assert_eq!(row, "cdefg");
    }

    #[test]
    fn test_renders_hero_headline_after_intro() {
        let now = Instant::now();
        let mut app = App::new(
            Arc::new(AppConfig::default()),
            Theme::default(),
            Viewport::new(80.0, 30.0),
            now,
        )
        .unwrap();
        // Let the intro finish
        app.tick(now);
        app.tick(now + std::time::Duration::from_secs(3));

        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        PageWidget::render_at(&mut buf, area, &app, noon());
        let screen: String = (0..30u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|p| buf[p].symbol().to_string())
            .collect();
        assert!(screen.contains("NASI GORENG"));
        assert!(screen.contains("MINANG"));
    }
}
