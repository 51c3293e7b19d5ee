//! Polyline projection of a day's route.
//!
//! Map rendering draws the full path, closing leg included, so `length_km`
//! always sums every leg regardless of how the planner scores routes.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::tour::{Route, Stop};

/// A route geometry as `(latitude, longitude)` points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn from_route(route: &Route) -> Self {
        Self::new(route.stops.iter().map(Stop::coordinates).collect())
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Great-circle length of all legs.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }
}
