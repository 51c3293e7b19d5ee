//! Great-circle distances between coordinates.
//!
//! Coordinates are `(latitude, longitude)` pairs in degrees. All distances
//! are in kilometers.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points given as separate components.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two `(lat, lng)` points.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    haversine_distance(from.0, from.1, to.0, to.1)
}

/// Dense pairwise distance table for a fixed set of points.
///
/// The optimizer evaluates thousands of orderings over the same handful of
/// stops, so the legs are computed once up front. `get(i, j)` is the
/// distance from `points[i]` to `points[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn for_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut rows = vec![vec![0.0; n]; n];

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate().skip(i + 1) {
                let km = haversine_km(*from, *to);
                rows[i][j] = km;
                rows[j][i] = km;
            }
        }

        Self { rows }
    }

    /// Distance between two indexed points; out-of-range indices yield 0.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
