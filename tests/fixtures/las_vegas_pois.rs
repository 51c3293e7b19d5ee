//! Real Las Vegas / Henderson places as catalog POIs.
//!
//! Coordinates sourced from OpenStreetMap. Hours and prices are plausible
//! rather than current.

#![allow(dead_code)]

use itinerary_planner::hours::{OpeningHours, OpeningInterval};
use itinerary_planner::poi::Poi;
use jiff::civil::Weekday;

/// Hotel used as the daily start/end point.
pub const BELLAGIO: (f64, f64) = (36.1126, -115.1767);

/// Builder for test POIs with sensible defaults (open all day, free).
#[derive(Clone, Debug)]
pub struct TestPoi {
    poi: Poi,
}

impl TestPoi {
    pub fn new(id: u64, name: &str, lat: f64, lng: f64) -> Self {
        Self {
            poi: Poi::new(id, name, lat, lng).with_hours(OpeningHours::always_open()),
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.poi = self.poi.with_category(category);
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.poi = self.poi.with_cost(cost);
        self
    }

    /// Same hours every day, `(open, close)` in minutes.
    pub fn hours(mut self, open: i32, close: i32) -> Self {
        self.poi.opening_hours = OpeningHours::daily(vec![OpeningInterval::new(open, close)]);
        self
    }

    pub fn closed_on(mut self, weekday: Weekday) -> Self {
        self.poi.opening_hours = self.poi.opening_hours.clone().with_day(weekday, Vec::new());
        self
    }

    pub fn build(self) -> Poi {
        self.poi
    }
}

// ============================================================================
// Strip attractions
// ============================================================================

pub fn strip_attractions() -> Vec<Poi> {
    vec![
        TestPoi::new(1, "Fountains of Bellagio", 36.1128, -115.1741)
            .category("tourist_attraction")
            .build(),
        TestPoi::new(2, "High Roller", 36.1176, -115.1685)
            .category("amusement_park")
            .cost(37.0)
            .hours(720, 1440)
            .build(),
        TestPoi::new(3, "Shark Reef Aquarium", 36.0908, -115.1755)
            .category("aquarium")
            .cost(30.0)
            .hours(600, 1200)
            .build(),
        TestPoi::new(4, "The LINQ Promenade", 36.1180, -115.1705)
            .category("shopping_mall")
            .build(),
        TestPoi::new(5, "Wynn Las Vegas", 36.1263781, -115.1658180)
            .category("casino")
            .build(),
        TestPoi::new(6, "MGM Grand", 36.1023654, -115.1688720)
            .category("casino")
            .build(),
        TestPoi::new(7, "Hard Rock Cafe", 36.1041592, -115.1722166)
            .category("restaurant")
            .cost(25.0)
            .hours(480, 1380)
            .build(),
        TestPoi::new(8, "Spago by Wolfgang Puck", 36.1139368, -115.1741462)
            .category("restaurant")
            .cost(80.0)
            .hours(690, 1320)
            .build(),
    ]
}

// ============================================================================
// Museums and parks off the Strip
// ============================================================================

pub fn culture_and_parks() -> Vec<Poi> {
    vec![
        TestPoi::new(20, "Neon Museum", 36.1770, -115.1353)
            .category("museum")
            .cost(25.0)
            .hours(600, 1320)
            .build(),
        TestPoi::new(21, "Mob Museum", 36.1728, -115.1411)
            .category("museum")
            .cost(30.0)
            .hours(540, 1260)
            .build(),
        TestPoi::new(22, "Springs Preserve", 36.1676, -115.1907)
            .category("park")
            .cost(19.0)
            .hours(540, 1020)
            .closed_on(Weekday::Monday)
            .build(),
        TestPoi::new(23, "Sunset Park", 36.0705, -115.1217)
            .category("park")
            .hours(420, 1380)
            .build(),
        TestPoi::new(24, "Clark County Wetlands Park", 36.0902, -115.0278)
            .category("natural_feature")
            .hours(360, 1200)
            .build(),
        TestPoi::new(25, "Henderson Bird Viewing Preserve", 36.0376, -114.9914)
            .category("natural_feature")
            .hours(360, 900)
            .build(),
        TestPoi::new(26, "Guardian Angel Cathedral", 36.1330, -115.1640)
            .category("church")
            .hours(420, 1080)
            .build(),
        TestPoi::new(27, "Las Vegas-Clark County Library", 36.1561, -115.1404)
            .category("library")
            .hours(600, 1200)
            .closed_on(Weekday::Sunday)
            .build(),
    ]
}

// ============================================================================
// Henderson restaurants
// ============================================================================

pub fn henderson_restaurants() -> Vec<Poi> {
    vec![
        TestPoi::new(40, "I Love Sushi Henderson", 35.9916660, -115.1028343)
            .category("restaurant")
            .cost(35.0)
            .hours(660, 1290)
            .build(),
        TestPoi::new(41, "Islander's Grill", 36.0335058, -114.9856162)
            .category("restaurant")
            .cost(20.0)
            .hours(600, 1320)
            .build(),
        TestPoi::new(42, "Naga", 36.0137634, -114.9928676)
            .category("restaurant")
            .cost(28.0)
            .hours(660, 1260)
            .build(),
        TestPoi::new(43, "RibCage", 35.9949754, -115.0999810)
            .category("restaurant")
            .cost(24.0)
            .hours(660, 1320)
            .build(),
    ]
}

pub fn full_catalog() -> Vec<Poi> {
    let mut all = strip_attractions();
    all.extend(culture_and_parks());
    all.extend(henderson_restaurants());
    all
}

/// Open-all-day POIs around the Strip, for optimizer-focused tests.
pub fn open_strip_pois(count: usize) -> Vec<Poi> {
    strip_attractions()
        .into_iter()
        .take(count)
        .map(|mut poi| {
            poi.opening_hours = OpeningHours::always_open();
            poi
        })
        .collect()
}
