//! Points of interest as supplied by the catalog, and travel types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hours::OpeningHours;

/// Catalog identity of a POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(pub u64);

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A visitable location. Read-only to the engine.
///
/// Several POIs may share coordinates; the `id` is what distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: PoiId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: OpeningHours,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub photo_reference: Option<String>,
}

impl Poi {
    pub fn new(id: u64, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: PoiId(id),
            name: name.into(),
            address: String::new(),
            latitude,
            longitude,
            opening_hours: OpeningHours::closed(),
            categories: Vec::new(),
            rating: 0.0,
            cost: 0.0,
            photo_reference: None,
        }
    }

    pub fn with_hours(mut self, opening_hours: OpeningHours) -> Self {
        self.opening_hours = opening_hours;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Descriptive fields carried along with a stop.
    pub fn snapshot(&self) -> PoiSnapshot {
        PoiSnapshot {
            poi_id: Some(self.id),
            name: self.name.clone(),
            address: self.address.clone(),
            rating: self.rating,
            photo_reference: self.photo_reference.clone(),
            categories: self.categories.clone(),
        }
    }

    pub fn has_any_category(&self, categories: &BTreeSet<String>) -> bool {
        self.categories.iter().any(|c| categories.contains(c))
    }
}

/// Fixed descriptive payload of a stop.
///
/// `poi_id` is `None` for the day anchor and for ad hoc points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiSnapshot {
    pub poi_id: Option<PoiId>,
    pub name: String,
    pub address: String,
    pub rating: f32,
    pub photo_reference: Option<String>,
    pub categories: Vec<String>,
}

impl PoiSnapshot {
    /// Snapshot for a point that is not in the catalog.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Kind of trip requested by the traveller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelType {
    #[default]
    All,
    Natural,
    Cultural,
    Entertainment,
    Shopping,
    Food,
}

impl TravelType {
    /// Catalog categories admitted by this travel type; `None` means no filter.
    pub fn categories(self) -> Option<BTreeSet<String>> {
        let names: &[&str] = match self {
            Self::All => return None,
            Self::Natural => &["natural_feature", "park", "amusement_park"],
            Self::Cultural => &[
                "museum",
                "art_gallery",
                "church",
                "hindu_temple",
                "synagogue",
                "library",
            ],
            Self::Entertainment => &[
                "amusement_park",
                "aquarium",
                "casino",
                "movie_theater",
                "night_club",
                "zoo",
                "stadium",
            ],
            Self::Shopping => &["shopping_mall", "store", "department_store", "clothing_store"],
            Self::Food => &["restaurant", "cafe", "bakery", "bar"],
        };
        Some(names.iter().map(|name| (*name).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_filter() {
        assert!(TravelType::All.categories().is_none());
    }

    #[test]
    fn test_natural_categories() {
        let categories = TravelType::Natural.categories().unwrap_or_default();
        assert_eq!(categories.len(), 3);
        assert!(categories.contains("park"));
        assert!(categories.contains("natural_feature"));
        assert!(categories.contains("amusement_park"));
    }

    #[test]
    fn test_category_match() {
        let poi = Poi::new(1, "Red Rock", 36.13, -115.42).with_category("park");
        let natural = TravelType::Natural.categories().unwrap_or_default();
        let food = TravelType::Food.categories().unwrap_or_default();
        assert!(poi.has_any_category(&natural));
        assert!(!poi.has_any_category(&food));
    }

    #[test]
    fn test_travel_type_serde_name() {
        let json = serde_json::to_string(&TravelType::Natural).unwrap();
        assert_eq!(json, "\"NATURAL\"");
        let parsed: TravelType = serde_json::from_str("\"FOOD\"").unwrap();
        assert_eq!(parsed, TravelType::Food);
    }

    #[test]
    fn test_snapshot_keeps_identity() {
        let poi = Poi::new(7, "Museum", 0.0, 0.0);
        let snapshot = poi.snapshot();
        assert_eq!(snapshot.poi_id, Some(PoiId(7)));
        assert_eq!(snapshot.name, "Museum");
        assert_eq!(PoiSnapshot::named("Hotel").poi_id, None);
    }
}
