//! Requests, per-day results and the itinerary record.

use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::poi::{PoiId, TravelType};
use crate::polyline::Polyline;
use crate::store::ItineraryId;
use crate::tour::{Route, TravelSummary};

/// Inclusive per-visit cost range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBounds {
    pub min: f64,
    pub max: f64,
}

impl CostBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, cost: f64) -> bool {
        self.min <= cost && cost <= self.max
    }
}

/// A multi-day planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub anchor_name: String,
    /// Start and end point of every day, `(latitude, longitude)`.
    pub anchor: (f64, f64),
    pub start_date: Date,
    /// Last planned day, inclusive.
    pub end_date: Date,
    #[serde(default)]
    pub travel_type: TravelType,
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    #[serde(default)]
    pub cost_bounds: Option<CostBounds>,
    /// Seed of the optimizer's random generator.
    #[serde(default)]
    pub seed: u64,
}

fn default_party_size() -> u32 {
    1
}

impl PlanRequest {
    pub fn new(anchor_name: impl Into<String>, anchor: (f64, f64), start_date: Date, end_date: Date) -> Self {
        Self {
            anchor_name: anchor_name.into(),
            anchor,
            start_date,
            end_date,
            travel_type: TravelType::All,
            party_size: default_party_size(),
            cost_bounds: None,
            seed: 0,
        }
    }

    pub fn with_travel_type(mut self, travel_type: TravelType) -> Self {
        self.travel_type = travel_type;
        self
    }

    pub fn with_party_size(mut self, party_size: u32) -> Self {
        self.party_size = party_size;
        self
    }

    pub fn with_cost_bounds(mut self, bounds: CostBounds) -> Self {
        self.cost_bounds = Some(bounds);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.end_date < self.start_date {
            return Err(PlanError::InvalidRequest(format!(
                "end date {} precedes start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.party_size == 0 {
            return Err(PlanError::InvalidRequest("party size must be positive".to_string()));
        }
        if let Some(bounds) = self.cost_bounds {
            if bounds.min > bounds.max {
                return Err(PlanError::InvalidRequest(format!(
                    "cost bounds {}..{} are inverted",
                    bounds.min, bounds.max
                )));
            }
        }
        let (lat, lng) = self.anchor;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(PlanError::InvalidRequest(format!("anchor ({lat}, {lng}) is not a coordinate")));
        }
        Ok(())
    }

    /// Every date from start to end, inclusive.
    pub fn dates(&self) -> Result<Vec<Date>, PlanError> {
        let mut dates = Vec::new();
        let mut day = self.start_date;
        while day <= self.end_date {
            dates.push(day);
            if day == self.end_date {
                break;
            }
            day = day
                .tomorrow()
                .map_err(|err| PlanError::InvalidRequest(err.to_string()))?;
        }
        Ok(dates)
    }
}

/// How a day's route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Reordered by the genetic optimizer.
    Optimized,
    /// One visit only; a single ordering exists.
    Direct,
    /// No POI could be scheduled; the route is anchor to anchor.
    Empty,
    /// The optimizer ran out of retries and the seed order was kept.
    SeedFallback,
    /// Order supplied by the caller and saved as-is.
    Edited,
}

/// One planned day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRoute {
    pub date: Date,
    pub distance: f64,
    pub route: Route,
    pub status: DayStatus,
}

impl DayRoute {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn path(&self) -> Polyline {
        Polyline::from_route(&self.route)
    }

    pub fn travel_summaries(&self) -> Vec<TravelSummary> {
        self.route.travel_summaries()
    }

    /// Catalog POIs visited this day, in order.
    pub fn poi_ids(&self) -> Vec<PoiId> {
        self.route.stops.iter().filter_map(|stop| stop.poi_id()).collect()
    }

    pub fn cost(&self) -> f64 {
        self.route.interior().iter().map(|stop| stop.cost).sum()
    }
}

/// Result of a planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPlan {
    pub total_days: usize,
    pub days: Vec<DayRoute>,
    pub estimated_cost: f64,
}

impl ItineraryPlan {
    pub fn total_distance(&self) -> f64 {
        self.days.iter().map(|day| day.distance).sum()
    }
}

/// `party_size` times the cost of every visit.
pub fn estimate_cost(days: &[DayRoute], party_size: u32) -> f64 {
    f64::from(party_size) * days.iter().map(DayRoute::cost).sum::<f64>()
}

/// A persisted itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: Option<ItineraryId>,
    pub anchor_name: String,
    pub anchor: (f64, f64),
    pub start_date: Date,
    pub end_date: Date,
    pub travel_type: TravelType,
    pub party_size: u32,
    pub seed: u64,
    pub estimated_cost: f64,
    pub days: Vec<DayRoute>,
}

impl Itinerary {
    pub fn new(request: &PlanRequest, days: Vec<DayRoute>, estimated_cost: f64) -> Self {
        Self {
            id: None,
            anchor_name: request.anchor_name.clone(),
            anchor: request.anchor,
            start_date: request.start_date,
            end_date: request.end_date,
            travel_type: request.travel_type,
            party_size: request.party_size,
            seed: request.seed,
            estimated_cost,
            days,
        }
    }

    pub fn from_plan(request: &PlanRequest, plan: ItineraryPlan) -> Self {
        Self::new(request, plan.days, plan.estimated_cost)
    }

    pub fn total_days(&self) -> usize {
        self.days.len()
    }

    /// Replace the days and re-derive the cost estimate.
    pub fn replace_days(&mut self, days: Vec<DayRoute>) {
        self.estimated_cost = estimate_cost(&days, self.party_size);
        self.days = days;
    }
}

/// A caller-edited stop, before times are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditedStop {
    Catalog(PoiId),
    /// A point outside the catalog; treated as open all day.
    AdHoc {
        name: String,
        latitude: f64,
        longitude: f64,
    },
}

/// New interior stops for one day of an existing itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditedDay {
    /// 0-based index into the itinerary's days.
    pub day_index: usize,
    pub stops: Vec<EditedStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeMode {
    /// Save the edited order as given.
    Update,
    /// Re-optimize the edited stops.
    Generate,
    /// Report infeasible stops; keep the itinerary unless everything fits.
    CheckOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeOutcome {
    /// Every day of the itinerary after the recompute.
    pub days: Vec<DayRoute>,
    /// Names of stops whose planned time misses their opening hours.
    pub infeasible_stops: Vec<String>,
}

impl RecomputeOutcome {
    pub fn is_feasible(&self) -> bool {
        self.infeasible_stops.is_empty()
    }

    /// Fail with [`PlanError::InfeasibleEdit`] when any stop was infeasible.
    pub fn into_checked(self) -> Result<Vec<DayRoute>, PlanError> {
        if self.infeasible_stops.is_empty() {
            Ok(self.days)
        } else {
            Err(PlanError::InfeasibleEdit {
                stops: self.infeasible_stops,
            })
        }
    }
}
