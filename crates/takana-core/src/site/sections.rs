//! Section composition of the Takana Juo page
//!
//! Seven sections, top to bottom: five pinned (hero, brand, story, menu,
//! hours) and two that scroll normally (reviews, order). Element ids are
//! `<section>.<node>`.

use crate::config::EngineConfig;
use crate::geometry::{Length, VisualState};
use crate::motion::Ease;
use crate::section::SectionDescriptor;
use crate::timeline::{IntroTimeline, PinPhases, PinnedMotion, RevealBand, RevealGroup};
use crate::Result;

pub const HERO: &str = "hero";
pub const BRAND: &str = "brand";
pub const STORY: &str = "story";
pub const MENU: &str = "menu";
pub const HOURS: &str = "hours";
pub const REVIEWS: &str = "reviews";
pub const ORDER: &str = "order";

/// Height of the viewport the page was designed against, for pixel offsets
const DESIGN_HEIGHT: f64 = 900.0;

/// A design-pixel offset as a share of viewport height
fn px(value: f64) -> Length {
    Length::Vh(value / DESIGN_HEIGHT * 100.0)
}

fn hidden() -> VisualState {
    VisualState::hidden()
}

/// Every section of the page in document order
pub fn page(config: &EngineConfig) -> Result<Vec<SectionDescriptor>> {
    let phases = PinPhases::from(config);
    let length = config.scroll_length;
    Ok(vec![
        hero(phases, length)?,
        brand(phases, length)?,
        story(phases, length)?,
        menu(phases, length)?,
        hours(phases, length)?,
        reviews()?,
        order()?,
    ])
}

/// Full-bleed hero: plays an intro on load, then exits as the pin scrolls
pub fn hero(phases: PinPhases, length: f64) -> Result<SectionDescriptor> {
    let intro = IntroTimeline::builder()
        .tween("hero.bg", hidden().scale(1.08), 0.0, 0.9, Ease::Power2Out)
        .tween("hero.line1", hidden().y(px(40.0)), 0.4, 0.7, Ease::Power3Out)
        .tween("hero.line2", hidden().y(px(40.0)), 0.46, 0.7, Ease::Power3Out)
        .tween("hero.subhead", hidden().y(px(24.0)), 0.76, 0.6, Ease::Power3Out)
        .tween("hero.cta", hidden().y(px(24.0)), 0.96, 0.6, Ease::Power3Out)
        .tween(
            "hero.stamp",
            hidden().scale(0.6).rotate(-25.0),
            1.16,
            0.65,
            Ease::BackOut(1.8),
        )
        .build()?;

    let elements = vec![
        PinnedMotion::new("hero.headline")
            .exit(hidden().x(Length::Vw(-18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("hero.subhead")
            .exit(hidden().y(Length::Vh(10.0)), 0.02)
            .build(phases)?,
        PinnedMotion::new("hero.cta")
            .exit(hidden().y(Length::Vh(10.0)), 0.04)
            .build(phases)?,
        PinnedMotion::new("hero.stamp")
            .exit(hidden().x(Length::Vw(12.0)).rotate(25.0).scale(0.85), 0.0)
            .build(phases)?,
        PinnedMotion::new("hero.bg")
            .exit(VisualState::resting().scale(1.06).opacity(0.35), 0.0)
            .build(phases)?,
    ];

    Ok(SectionDescriptor::pinned(HERO, length)
        .elements(elements)
        .intro(intro)
        .reset_on_leave_back(true))
}

/// Photo collage with the brand panel
pub fn brand(phases: PinPhases, length: f64) -> Result<SectionDescriptor> {
    let elements = vec![
        PinnedMotion::new("brand.photo")
            .enter(hidden().x(Length::Vw(-60.0)).scale(0.96), 0.0)
            .exit(hidden().x(Length::Vw(-18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("brand.photo_right")
            .enter(hidden().x(Length::Vw(60.0)).scale(0.98), 0.0)
            .exit(hidden().x(Length::Vw(18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("brand.panel")
            .enter(hidden().y(Length::Vh(60.0)), 0.05)
            .exit(hidden().y(Length::Vh(18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("brand.headline")
            .enter(hidden().x(Length::Vw(18.0)), 0.1)
            .exit(hidden().x(Length::Vw(-10.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("brand.promise")
            .enter(hidden().y(Length::Vh(6.0)), 0.15)
            .exit(hidden().y(Length::Vh(4.0)), 0.02)
            .build(phases)?,
        PinnedMotion::new("brand.stamp")
            .enter_with(hidden().scale(0.4).rotate(-90.0), 0.12, Ease::BackOut(1.6))
            .exit(hidden().scale(0.7), 0.0)
            .build(phases)?,
    ];
    Ok(SectionDescriptor::pinned(BRAND, length).elements(elements))
}

/// The recipe: photo plus copy panel
pub fn story(phases: PinPhases, length: f64) -> Result<SectionDescriptor> {
    let elements = vec![
        PinnedMotion::new("story.photo")
            .enter(hidden().x(Length::Vw(-60.0)).scale(0.98), 0.0)
            .exit(hidden().x(Length::Vw(-18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("story.panel")
            .enter(hidden().x(Length::Vw(60.0)), 0.0)
            .exit(hidden().x(Length::Vw(18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("story.headline")
            .enter(hidden().y(Length::Vh(-10.0)), 0.08)
            .exit(hidden().y(Length::Vh(-6.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("story.body")
            .enter(hidden().y(Length::Vh(6.0)), 0.12)
            .exit(hidden().y(Length::Vh(4.0)), 0.02)
            .build(phases)?,
        PinnedMotion::new("story.cta")
            .enter(hidden().y(Length::Vh(8.0)), 0.15)
            .exit(hidden().y(Length::Vh(5.0)), 0.04)
            .build(phases)?,
        PinnedMotion::new("story.stamp")
            .enter_with(hidden().scale(0.3).rotate(-120.0), 0.1, Ease::BackOut(1.7))
            .exit(hidden().scale(0.7), 0.0)
            .build(phases)?,
    ];
    Ok(SectionDescriptor::pinned(STORY, length).elements(elements))
}

pub fn menu(phases: PinPhases, length: f64) -> Result<SectionDescriptor> {
    let elements = vec![
        PinnedMotion::new("menu.photo")
            .enter(hidden().x(Length::Vw(-60.0)).scale(0.98), 0.0)
            .exit(hidden().x(Length::Vw(-18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("menu.panel")
            .enter(hidden().x(Length::Vw(60.0)), 0.0)
            .exit(hidden().x(Length::Vw(18.0)), 0.0)
            .build(phases)?,
    ];
    Ok(SectionDescriptor::pinned(MENU, length).elements(elements))
}

pub fn hours(phases: PinPhases, length: f64) -> Result<SectionDescriptor> {
    let elements = vec![
        PinnedMotion::new("hours.photo")
            .enter(hidden().x(Length::Vw(-60.0)).scale(0.98), 0.0)
            .exit(hidden().x(Length::Vw(-18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("hours.photo_right")
            .enter(hidden().x(Length::Vw(60.0)).scale(0.98), 0.0)
            .exit(hidden().x(Length::Vw(18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("hours.panel")
            .enter(hidden().y(Length::Vh(60.0)), 0.05)
            .exit(hidden().y(Length::Vh(18.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("hours.headline")
            .enter(hidden().x(Length::Vw(12.0)), 0.1)
            .exit(hidden().x(Length::Vw(-8.0)), 0.0)
            .build(phases)?,
        PinnedMotion::new("hours.times")
            .enter(hidden().y(Length::Vh(4.0)), 0.15)
            .exit(hidden().y(Length::Vh(3.0)), 0.02)
            .build(phases)?,
        PinnedMotion::new("hours.cta")
            .enter_with(hidden().scale(0.8), 0.18, Ease::BackOut(1.6))
            .exit(hidden().scale(0.9), 0.04)
            .build(phases)?,
        PinnedMotion::new("hours.stamp")
            .enter_with(hidden().scale(0.4).rotate(-90.0), 0.12, Ease::BackOut(1.7))
            .exit(hidden().scale(0.7), 0.0)
            .build(phases)?,
    ];
    Ok(SectionDescriptor::pinned(HOURS, length).elements(elements))
}

/// Heading plus three staggered review cards
pub fn reviews() -> Result<SectionDescriptor> {
    let heading = RevealGroup::new(RevealBand::new(0.0, 0.8, 0.55), hidden().y(px(24.0)))
        .item("reviews.heading")
        .build()?;
    let cards = RevealGroup::new(RevealBand::new(0.3, 0.8, 0.45), hidden().y(px(40.0)).scale(0.98))
        .item("reviews.card0")
        .item("reviews.card1")
        .item("reviews.card2")
        .stagger(0.12)
        .build()?;
    Ok(SectionDescriptor::inline(REVIEWS, 1.1)
        .reveal(heading)
        .reveal(cards))
}

/// Delivery partners, location and footer
pub fn order() -> Result<SectionDescriptor> {
    let heading = RevealGroup::new(RevealBand::new(0.0, 0.8, 0.55), hidden().y(px(24.0)))
        .item("order.heading")
        .build()?;
    let delivery = RevealGroup::new(RevealBand::new(0.0, 0.7, 0.45), hidden().x(Length::Vw(-6.0)))
        .item("order.delivery")
        .build()?;
    let visit = RevealGroup::new(RevealBand::new(0.0, 0.7, 0.45), hidden().x(Length::Vw(6.0)))
        .item("order.visit")
        .build()?;
    Ok(SectionDescriptor::inline(ORDER, 1.3)
        .reveal(heading)
        .reveal(delivery)
        .reveal(visit))
}
