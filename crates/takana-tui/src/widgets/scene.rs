//! Cell layout of each section
//!
//! Every section is described as a list of boxes placed in fractions of the
//! section's on-screen rectangle. Boxes whose id names an animated element
//! follow that element's transform; the rest are static.

use chrono::NaiveDateTime;
use ratatui::layout::Alignment;
use takana_core::site::content::{self, Link, MenuItem};
use takana_core::site::sections;

/// Background of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    None,
    Card,
    Photo,
    Accent,
}

/// Foreground role of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Text,
    Muted,
    Accent,
    Star,
    /// Dark text on an accent fill
    Inverse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Right-aligned trailer, e.g. a price
    pub trailer: Option<String>,
    pub tone: Tone,
    pub bold: bool,
    /// Word-wrap to the box width instead of truncating
    pub wrap: bool,
    /// Index into the page's outbound links
    pub link: Option<usize>,
}

impl TextLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            trailer: None,
            tone,
            bold: false,
            wrap: false,
            link: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    fn blank() -> Self {
        Self::new("", Tone::Text)
    }

    fn link(link: &Link) -> Self {
        let mut line = Self::new(link.label, Tone::Text).wrap();
        line.link = link_index(link);
        line
    }

    fn menu_item(item: &MenuItem) -> Self {
        let mut line = Self::new(item.name, Tone::Text);
        line.trailer = Some(item.price_label());
        line
    }
}

/// Box position as fractions of the section rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

const fn place(x: f64, y: f64, w: f64, h: f64) -> Place {
    Place { x, y, w, h }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Element id when the box is animated
    pub id: String,
    /// Container whose transform also applies to this box
    pub parent: Option<String>,
    pub place: Place,
    pub fill: Fill,
    pub align: Alignment,
    pub lines: Vec<TextLine>,
}

impl Node {
    fn new(id: impl Into<String>, place: Place) -> Self {
        Self {
            id: id.into(),
            parent: None,
            place,
            fill: Fill::None,
            align: Alignment::Left,
            lines: Vec::new(),
        }
    }

    fn within(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    fn fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    fn centered(mut self) -> Self {
        self.align = Alignment::Center;
        self
    }

    fn line(mut self, line: TextLine) -> Self {
        self.lines.push(line);
        self
    }

    fn lines(mut self, lines: impl IntoIterator<Item = TextLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    fn button(id: &str, place: Place, label: &str) -> Self {
        Self::new(id, place)
            .fill(Fill::Accent)
            .centered()
            .line(TextLine::new(label, Tone::Inverse).bold())
    }

    fn stamp(id: &str, place: Place, label: &str) -> Self {
        Self::new(id, place)
            .centered()
            .line(TextLine::new(format!("( {label} )"), Tone::Accent).bold())
    }
}

fn link_index(link: &Link) -> Option<usize> {
    content::links().iter().position(|l| l == link)
}

/// Boxes of one section in paint order; `now` drives the open-now badge
pub fn nodes(section: &str, now: NaiveDateTime) -> Vec<Node> {
    match section {
        sections::HERO => hero(),
        sections::BRAND => brand(),
        sections::STORY => story(),
        sections::MENU => menu(),
        sections::HOURS => hours(now),
        sections::REVIEWS => reviews(),
        sections::ORDER => order(),
        _ => Vec::new(),
    }
}

fn hero() -> Vec<Node> {
    let hero = &content::HERO;
    vec![
        Node::new("hero.bg", place(0.0, 0.0, 1.0, 1.0)).fill(Fill::Photo),
        Node::new("hero.headline", place(0.08, 0.3, 0.6, 0.24)),
        Node::new("hero.line1", place(0.08, 0.3, 0.6, 0.12))
            .within("hero.headline")
            .line(TextLine::new(hero.headline[0], Tone::Text).bold()),
        Node::new("hero.line2", place(0.08, 0.42, 0.6, 0.12))
            .within("hero.headline")
            .line(TextLine::new(hero.headline[1], Tone::Accent).bold()),
        Node::new("hero.subhead", place(0.08, 0.56, 0.5, 0.06))
            .line(TextLine::new(hero.subhead, Tone::Muted)),
        Node::button("hero.cta", place(0.08, 0.66, 0.16, 0.08), hero.cta),
        Node::stamp("hero.stamp", place(0.66, 0.12, 0.3, 0.08), hero.stamp),
    ]
}

fn brand() -> Vec<Node> {
    let brand = &content::BRAND_STORY;
    vec![
        Node::new("brand.photo", place(0.04, 0.08, 0.44, 0.84)).fill(Fill::Photo),
        Node::new("brand.photo_right", place(0.52, 0.08, 0.44, 0.3)).fill(Fill::Photo),
        Node::new("brand.panel", place(0.52, 0.42, 0.44, 0.5)).fill(Fill::Card),
        Node::new("brand.headline", place(0.55, 0.46, 0.38, 0.18))
            .within("brand.panel")
            .line(TextLine::new(brand.headline[0], Tone::Text).bold())
            .line(TextLine::new(brand.headline[1], Tone::Accent).bold()),
        Node::new("brand.promise", place(0.55, 0.66, 0.38, 0.08))
            .within("brand.panel")
            .line(TextLine::new(brand.promise, Tone::Muted)),
        Node::stamp("brand.stamp", place(0.74, 0.8, 0.2, 0.08), brand.stamp).within("brand.panel"),
    ]
}

fn story() -> Vec<Node> {
    let recipe = &content::RECIPE;
    let last = recipe.headline.len() - 1;
    let headline = Node::new("story.headline", place(0.59, 0.14, 0.34, 0.2))
        .within("story.panel")
        .lines(recipe.headline.iter().enumerate().map(|(i, l)| {
            let tone = if i == last { Tone::Accent } else { Tone::Text };
            TextLine::new(*l, tone).bold()
        }));
    vec![
        Node::new("story.photo", place(0.04, 0.08, 0.5, 0.84)).fill(Fill::Photo),
        Node::new("story.panel", place(0.56, 0.08, 0.4, 0.84)).fill(Fill::Card),
        headline,
        Node::new("story.body", place(0.59, 0.38, 0.34, 0.3))
            .within("story.panel")
            .line(TextLine::new(recipe.body, Tone::Muted).wrap()),
        Node::button("story.cta", place(0.59, 0.72, 0.14, 0.08), recipe.cta).within("story.panel"),
        Node::stamp("story.stamp", place(0.76, 0.72, 0.17, 0.08), recipe.stamp).within("story.panel"),
    ]
}

fn menu() -> Vec<Node> {
    let mut lines = vec![
        TextLine::new("MENU", Tone::Accent).bold(),
        TextLine::blank(),
        TextLine::new("ALA CARTE", Tone::Muted),
    ];
    lines.extend(content::ALA_CARTE.iter().map(TextLine::menu_item));
    lines.push(TextLine::blank());
    lines.push(TextLine::new("COMBO", Tone::Muted));
    lines.extend(content::COMBO.iter().map(TextLine::menu_item));

    vec![
        Node::new("menu.photo", place(0.04, 0.08, 0.44, 0.84)).fill(Fill::Photo),
        Node::new("menu.panel", place(0.52, 0.08, 0.44, 0.84))
            .fill(Fill::Card)
            .lines(lines),
    ]
}

fn hours(now: NaiveDateTime) -> Vec<Node> {
    let hours = &content::HOURS;
    let days = match (hours.schedule.days.first(), hours.schedule.days.last()) {
        (Some(first), Some(last)) => format!("{} – {}", first, last).to_uppercase(),
        _ => String::new(),
    };
    let badge = if hours.schedule.is_open_at(now) {
        TextLine::new("● Open now", Tone::Star)
    } else {
        TextLine::new("○ Closed now", Tone::Muted)
    };
    let directions = Link {
        label: hours.cta,
        url: content::MAPS_URL,
    };
    let mut cta = Node::button("hours.cta", place(0.61, 0.58, 0.22, 0.08), hours.cta).within("hours.panel");
    for line in &mut cta.lines {
        line.link = link_index(&directions);
    }

    vec![
        Node::new("hours.photo", place(0.04, 0.08, 0.3, 0.84)).fill(Fill::Photo),
        Node::new("hours.photo_right", place(0.36, 0.08, 0.2, 0.84)).fill(Fill::Photo),
        Node::new("hours.panel", place(0.58, 0.08, 0.38, 0.84)).fill(Fill::Card),
        Node::new("hours.headline", place(0.61, 0.14, 0.32, 0.18))
            .within("hours.panel")
            .line(TextLine::new(hours.headline[0], Tone::Text).bold())
            .line(TextLine::new(hours.headline[1], Tone::Accent).bold()),
        Node::new("hours.times", place(0.61, 0.36, 0.32, 0.16))
            .within("hours.panel")
            .line(TextLine::new(days, Tone::Muted))
            .line(TextLine::new(hours.schedule.label(), Tone::Text).bold())
            .line(badge),
        cta,
        Node::stamp("hours.stamp", place(0.76, 0.8, 0.17, 0.08), hours.stamp).within("hours.panel"),
    ]
}

fn reviews() -> Vec<Node> {
    let mut nodes = vec![Node::new("reviews.heading", place(0.04, 0.06, 0.92, 0.18))
        .centered()
        .line(TextLine::new(content::REVIEWS_HEADLINE.join(" "), Tone::Accent).bold())
        .line(TextLine::new(content::REVIEWS_TAGLINE, Tone::Muted))];

    for (i, review) in content::REVIEWS.iter().enumerate() {
        let x = 0.04 + i as f64 * 0.31;
        nodes.push(
            Node::new(format!("reviews.card{i}"), place(x, 0.3, 0.29, 0.5))
                .fill(Fill::Card)
                .centered()
                .line(TextLine::new("★".repeat(review.rating as usize), Tone::Star))
                .line(TextLine::blank())
                .line(TextLine::new(format!("\"{}\"", review.quote), Tone::Text).wrap())
                .line(TextLine::blank())
                .line(TextLine::new(review.author, Tone::Muted).bold()),
        );
    }
    nodes
}

fn order() -> Vec<Node> {
    vec![
        Node::new("order.heading", place(0.04, 0.05, 0.92, 0.15))
            .centered()
            .line(TextLine::new(content::ORDER_HEADLINE.join(" "), Tone::Accent).bold()),
        Node::new("order.delivery", place(0.04, 0.26, 0.44, 0.42))
            .fill(Fill::Card)
            .line(TextLine::new("DELIVERY", Tone::Muted).bold())
            .line(TextLine::blank())
            .lines(content::DELIVERY.iter().map(TextLine::link)),
        Node::new("order.visit", place(0.52, 0.26, 0.44, 0.42))
            .fill(Fill::Card)
            .line(TextLine::new("VISIT", Tone::Muted).bold())
            .line(TextLine::blank())
            .lines(content::VISIT.iter().map(TextLine::link)),
        Node::new("order.footer", place(0.04, 0.86, 0.92, 0.06))
            .centered()
            .line(TextLine::new(content::FOOTER, Tone::Muted)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use takana_core::EngineConfig;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_every_animated_element_has_a_box() {
        for section in takana_core::site::page(&EngineConfig::default()).unwrap() {
            let drawn: HashSet<String> = nodes(section.id.as_str(), noon())
                .into_iter()
                .map(|n| n.id)
                .collect();
            for id in section.element_ids() {
                assert!(drawn.contains(id.as_str()), "no box for {id}");
            }
        }
    }

    #[test]
    fn test_parents_precede_children() {
        for section in [sections::HERO, sections::BRAND, sections::STORY, sections::HOURS] {
            let nodes = nodes(section, noon());
            for (i, node) in nodes.iter().enumerate() {
                if let Some(parent) = &node.parent {
                    let at = nodes.iter().position(|n| &n.id == parent);
                    assert!(matches!(at, Some(p) if p < i), "{} before {}", parent, node.id);
                }
            }
        }
    }

    #[test]
    fn test_every_link_is_reachable() {
        let mut seen = HashSet::new();
        for section in [sections::HOURS, sections::ORDER] {
            for node in nodes(section, noon()) {
                seen.extend(node.lines.iter().filter_map(|l| l.link));
            }
        }
        assert_eq!(seen.len(), content::links().len());
    }

    #[test]
    fn test_open_badge() {
        let open = nodes(sections::HOURS, noon());
        let times = open.iter().find(|n| n.id == "hours.times").unwrap();
        assert_eq!(times.lines[0].text, "MON – FRI");
        assert_eq!(times.lines[2].text, "● Open now");

        let saturday = NaiveDate::from_ymd_opt(2024, 6, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let closed = nodes(sections::HOURS, saturday);
        let times = closed.iter().find(|n| n.id == "hours.times").unwrap();
        assert_eq!(times.lines[2].tone, Tone::Muted);
    }
}
