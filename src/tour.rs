//! Tour model: stops, routes and their distance / fitness views.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::haversine::{haversine_km, DistanceMatrix};
use crate::hours::{format_minutes, ActiveTime, OpeningInterval};
use crate::poi::{Poi, PoiId, PoiSnapshot};

/// Fitness assigned to a zero-length route.
pub const ZERO_DISTANCE_FITNESS: f64 = 1.0e9;

/// A POI bound to a planned visit on one specific weekday.
///
/// `open_times` are the POI's intervals for the scheduled weekday, captured
/// when the stop was created. The optimizer checks feasibility against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub snapshot: PoiSnapshot,
    pub latitude: f64,
    pub longitude: f64,
    pub time: ActiveTime,
    pub open_times: Vec<OpeningInterval>,
    pub cost: f64,
}

impl Stop {
    /// A catalog POI visited at `time`.
    pub fn visit(poi: &Poi, open_times: &[OpeningInterval], time: ActiveTime) -> Self {
        Self {
            snapshot: poi.snapshot(),
            latitude: poi.latitude,
            longitude: poi.longitude,
            time,
            open_times: open_times.to_vec(),
            cost: poi.cost,
        }
    }

    /// The fixed start/end point of a day.
    pub fn anchor(name: impl Into<String>, coordinates: (f64, f64), time: ActiveTime) -> Self {
        Self::ad_hoc(name, coordinates, time, Vec::new())
    }

    /// A point given by raw coordinates rather than a catalog entry.
    pub fn ad_hoc(
        name: impl Into<String>,
        coordinates: (f64, f64),
        time: ActiveTime,
        open_times: Vec<OpeningInterval>,
    ) -> Self {
        Self {
            snapshot: PoiSnapshot::named(name),
            latitude: coordinates.0,
            longitude: coordinates.1,
            time,
            open_times,
            cost: 0.0,
        }
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn poi_id(&self) -> Option<PoiId> {
        self.snapshot.poi_id
    }

    pub fn name(&self) -> &str {
        &self.snapshot.name
    }

    pub fn travel_summary(&self) -> TravelSummary {
        TravelSummary {
            name: self.snapshot.name.clone(),
            address: self.snapshot.address.clone(),
            arrival: format_minutes(self.time.open_time),
            departure: format_minutes(self.time.close_time),
            cost: self.cost,
            coordinates: self.coordinates(),
        }
    }
}

/// Presentation projection of a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSummary {
    pub name: String,
    pub address: String,
    pub arrival: String,
    pub departure: String,
    pub cost: f64,
    pub coordinates: (f64, f64),
}

/// Ordered stops of one day; first and last are the anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops strictly between the two anchors.
    pub fn interior(&self) -> &[Stop] {
        match self.stops.len() {
            0..=2 => &[],
            n => &self.stops[1..n - 1],
        }
    }

    pub fn total_distance(&self, include_return_leg: bool) -> f64 {
        let legs = leg_count(self.stops.len(), include_return_leg);
        self.stops
            .windows(2)
            .take(legs)
            .map(|pair| haversine_km(pair[0].coordinates(), pair[1].coordinates()))
            .sum()
    }

    pub fn fitness(&self, include_return_leg: bool) -> f64 {
        fitness_for(self.total_distance(include_return_leg))
    }

    /// Re-time every stop on the planner's grid, in the current order.
    ///
    /// Anchors get zero-length times at the clock's start and end; each
    /// visit arrives one transit allowance after the previous departure.
    pub fn assign_grid_times(&mut self, config: &PlannerConfig) {
        let last = self.stops.len().saturating_sub(1);
        let mut clock = config.start_time;
        for (position, stop) in self.stops.iter_mut().enumerate() {
            if position == 0 || position == last {
                stop.time = ActiveTime::new(clock, clock);
                continue;
            }
            clock += config.transit_allowance;
            stop.time = ActiveTime::new(clock, clock + config.stay_time);
            clock += config.stay_time;
        }
    }

    pub fn travel_summaries(&self) -> Vec<TravelSummary> {
        self.stops.iter().map(Stop::travel_summary).collect()
    }
}

/// Number of consecutive legs summed for a route of `len` stops.
///
/// Without the return leg, the leg into the closing anchor is dropped.
pub fn leg_count(len: usize, include_return_leg: bool) -> usize {
    if include_return_leg {
        len.saturating_sub(1)
    } else {
        len.saturating_sub(2)
    }
}

/// Distance of an ordering of matrix indices.
pub fn order_distance(order: &[usize], matrix: &DistanceMatrix, include_return_leg: bool) -> f64 {
    let legs = leg_count(order.len(), include_return_leg);
    order
        .windows(2)
        .take(legs)
        .map(|pair| matrix.get(pair[0], pair[1]))
        .sum()
}

pub fn fitness_for(distance: f64) -> f64 {
    if distance > 0.0 {
        1.0 / distance
    } else {
        ZERO_DISTANCE_FITNESS
    }
}
