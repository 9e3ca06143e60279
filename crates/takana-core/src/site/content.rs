//! Copy, menu, reviews and outbound links shown on the page
//!
//! Immutable data; the engine never reads it. Links are opaque URLs for the
//! host to hand to the platform opener.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

pub const BRAND: &str = "TAKANA JUO";

pub struct Hero {
    pub headline: [&'static str; 2],
    pub subhead: &'static str,
    pub cta: &'static str,
    pub stamp: &'static str,
}

pub const HERO: Hero = Hero {
    headline: ["NASI GORENG", "MINANG"],
    subhead: "Pasti Takana Juo",
    cta: "Menu",
    stamp: "OPEN DAILY • 10AM–10PM",
};

pub struct Brand {
    pub headline: [&'static str; 2],
    pub promise: &'static str,
    pub stamp: &'static str,
}

pub const BRAND_STORY: Brand = Brand {
    headline: ["TAKANA", "JUO"],
    promise: "Murah • Mudah • Sedap",
    stamp: "SINCE 2012",
};

pub struct Recipe {
    pub headline: [&'static str; 3],
    pub body: &'static str,
    pub cta: &'static str,
    pub stamp: &'static str,
}

pub const RECIPE: Recipe = Recipe {
    headline: ["SIMPLE", "INGREDIENTS.", "BIG FLAVOR."],
    body: "We fry to order on high heat: garlic, shallots, kecap manis, and a blend of chili sambal. \
           No shortcuts. Just the same recipe we've served since day one.",
    cta: "Our Story",
    stamp: "HALAL",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    /// Price in whole ringgit
    pub price: u32,
}

impl MenuItem {
    const fn new(name: &'static str, price: u32) -> Self {
        Self { name, price }
    }

    pub fn price_label(&self) -> String {
        format!("RM {}", self.price)
    }
}

pub const ALA_CARTE: [MenuItem; 4] = [
    MenuItem::new("Nasi Goreng", 4),
    MenuItem::new("Nasi Goreng Telur", 6),
    MenuItem::new("Nasi Goreng Daging", 7),
    MenuItem::new("Nasi Goreng Ayam", 9),
];

pub const COMBO: [MenuItem; 4] = [
    MenuItem::new("Nasi Goreng Daging Telur", 10),
    MenuItem::new("Nasi Goreng Ayam Telur", 11),
    MenuItem::new("Nasi Goreng Special", 12),
    MenuItem::new("Nasi Goreng Ayam Double", 13),
];

/// Weekly opening hours, whole hours in local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub days: &'static [Weekday],
    pub open_hour: u32,
    pub close_hour: u32,
}

impl OpeningHours {
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        self.days.contains(&at.weekday()) && (self.open_hour..self.close_hour).contains(&at.hour())
    }

    /// e.g. `10AM – 5PM`
    pub fn label(&self) -> String {
        format!("{} – {}", twelve_hour(self.open_hour), twelve_hour(self.close_hour))
    }
}

fn twelve_hour(hour: u32) -> String {
    match hour {
        0 => "12AM".to_string(),
        1..=11 => format!("{hour}AM"),
        12 => "12PM".to_string(),
        _ => format!("{}PM", hour - 12),
    }
}

pub struct Hours {
    pub headline: [&'static str; 2],
    pub schedule: OpeningHours,
    pub cta: &'static str,
    pub stamp: &'static str,
}

pub const HOURS: Hours = Hours {
    headline: ["OPEN", "WEEKDAYS"],
    schedule: OpeningHours {
        days: &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        open_hour: 10,
        close_hour: 17,
    },
    cta: "Get Directions",
    stamp: "PARKING",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Review {
    pub quote: &'static str,
    pub author: &'static str,
    pub rating: u8,
}

pub const REVIEWS_HEADLINE: [&str; 2] = ["CUSTOMER", "LOVE"];
pub const REVIEWS_TAGLINE: &str = "Real plates. Real people. Real reviews.";

pub const REVIEWS: [Review; 3] = [
    Review {
        quote: "Best nasi goreng in the town. Crispy chicken, smoky wok hei. Perfect.",
        author: "Aisyah",
        rating: 5,
    },
    Review {
        quote: "Fast, hot, and consistent. We come every weekend.",
        author: "Rizal",
        rating: 5,
    },
    Review {
        quote: "Simple menu done right. The sambal hits different.",
        author: "Hafiz",
        rating: 5,
    },
];

/// Outbound link target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub url: &'static str,
}

pub const MAPS_URL: &str = "https://www.google.com/maps?q=NASI+GORENG+MINANG+TAKANA+JUO+Kuala+Lumpur";

pub const ORDER_HEADLINE: [&str; 2] = ["TAPAU", "IT NOW"];

pub const DELIVERY: [Link; 2] = [
    Link {
        label: "GrabFood",
        url: "https://www.grab.com/my/food/",
    },
    Link {
        label: "foodpanda",
        url: "https://www.foodpanda.my/",
    },
];

pub const VISIT: [Link; 3] = [
    Link {
        label: "Instagram",
        url: "https://www.instagram.com/takanajuoofficial",
    },
    Link {
        label: "Takana Juo, 69, Jalan Haji Yahya Sheikh Ahmad, Kampung Baru, 50300 Kuala Lumpur",
        url: MAPS_URL,
    },
    Link {
        label: "+60 12-345-6789",
        url: "tel:+60123456789",
    },
];

pub const FOOTER: &str = "© 2024 Takana Juo. All rights reserved.";

/// Every outbound link on the page, top to bottom
pub fn links() -> Vec<Link> {
    let directions = Link {
        label: HOURS.cta,
        url: MAPS_URL,
    };
    std::iter::once(directions)
        .chain(DELIVERY)
        .chain(VISIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_opening_hours() {
        let hours = HOURS.schedule;
        // 2024-06-05 is a Wednesday
        assert!(hours.is_open_at(at(2024, 6, 5, 10)));
        assert!(hours.is_open_at(at(2024, 6, 5, 16)));
        assert!(!hours.is_open_at(at(2024, 6, 5, 17)));
        assert!(!hours.is_open_at(at(2024, 6, 5, 9)));
        // Saturday
        assert!(!hours.is_open_at(at(2024, 6, 8, 12)));
        assert_eq!(hours.label(), "10AM – 5PM");
    }

    #[test]
    fn test_menu_prices_ascend() {
        for menu in [ALA_CARTE, COMBO] {
            assert!(menu.windows(2).all(|w| w[0].price < w[1].price));
        }
        assert_eq!(COMBO[3].price_label(), "RM 13");
    }

    #[test]
    fn test_links_are_absolute() {
        let links = links();
        assert_eq!(links.len(), 6);
        assert!(links
            .iter()
            .all(|l| l.url.starts_with("https://") || l.url.starts_with("tel:")));
    }
}
