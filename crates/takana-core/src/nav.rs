//! Sticky navigation bar state

use crate::section::SectionId;

/// Scroll offset, in viewport heights, past which the bar turns dark
pub const DARK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStyle {
    /// Transparent over the hero
    Clear,
    /// Solid background once the hero is scrolled away
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Menu,
    Reviews,
    Order,
}

impl NavLink {
    pub const ALL: [NavLink; 3] = [NavLink::Menu, NavLink::Reviews, NavLink::Order];

    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Menu => "Menu",
            NavLink::Reviews => "Reviews",
            NavLink::Order => "Order",
        }
    }

    /// Section the link scrolls to
    pub fn section(&self) -> SectionId {
        SectionId::from(match self {
            NavLink::Menu => "menu",
            NavLink::Reviews => "reviews",
            NavLink::Order => "order",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavState {
    pub style: NavStyle,
}

impl NavState {
    pub fn for_scroll(scroll: f64, viewport_height: f64) -> Self {
        let style = if scroll > viewport_height * DARK_THRESHOLD {
            NavStyle::Dark
        } else {
            NavStyle::Clear
        };
        Self { style }
    }

    pub fn is_dark(&self) -> bool {
        self.style == NavStyle::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_after_half_viewport() {
        assert_eq!(NavState::for_scroll(0.0, 40.0).style, NavStyle::Clear);
        assert_eq!(NavState::for_scroll(20.0, 40.0).style, NavStyle::Clear);
        assert!(NavState::for_scroll(20.5, 40.0).is_dark());
    }

    #[test]
    fn test_link_targets() {
        let targets: Vec<String> = NavLink::ALL.iter().map(|l| l.section().to_string()).collect();
        assert_eq!(targets, vec!["menu", "reviews", "order"]);
    }
}
