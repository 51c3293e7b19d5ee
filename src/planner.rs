//! Itinerary assembly: seeding every day, optimizing it, and recomputing
//! caller-edited days.

use std::collections::HashSet;

use jiff::civil::Date;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use crate::catalog::CatalogFilter;
use crate::config::PlannerConfig;
use crate::error::{CatalogError, OptimizeError, PlanError};
use crate::genetic::GeneticOptimizer;
use crate::hours::{fits_window, ActiveTime, OpeningInterval, MINUTES_PER_DAY};
use crate::itinerary::{
    estimate_cost, DayRoute, DayStatus, EditedDay, EditedStop, Itinerary, ItineraryPlan, PlanRequest,
    RecomputeMode, RecomputeOutcome,
};
use crate::poi::PoiId;
use crate::seeder::seed_day;
use crate::store::ItineraryId;
use crate::tour::{Route, Stop};
use crate::traits::{ItineraryStore, PoiCatalog};

/// Multi-day itinerary planner over a POI catalog.
#[derive(Debug, Clone)]
pub struct Planner<C> {
    catalog: C,
    config: PlannerConfig,
}

impl<C: PoiCatalog> Planner<C> {
    pub fn new(catalog: C, config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Plan every day of the request's date range.
    ///
    /// Days are seeded in date order so that no POI is used twice across the
    /// itinerary. A day that cannot be filled or optimized degrades on its
    /// own; catalog and validation failures fail the whole request.
    #[instrument(skip_all, level = "debug", fields(start = %request.start_date, end = %request.end_date))]
    pub fn plan_itinerary(&self, request: &PlanRequest) -> Result<ItineraryPlan, PlanError> {
        request.validate()?;
        let dates = request.dates()?;

        let filter = CatalogFilter {
            categories: request.travel_type.categories(),
            cost: request.cost_bounds,
        };
        let pois = self.catalog.list_pois(&filter)?;
        let anchor = Stop::anchor(
            request.anchor_name.clone(),
            request.anchor,
            ActiveTime::new(self.config.start_time, self.config.start_time),
        );

        let mut used: HashSet<PoiId> = HashSet::new();
        let mut days = Vec::with_capacity(dates.len());
        for (index, date) in dates.into_iter().enumerate() {
            let seed = seed_day(&anchor, date.weekday(), &pois, &used, &self.config);
            used.extend(seed.used.iter().copied());

            let mut rng = day_rng(request.seed, index);
            days.push(self.plan_day(date, seed.stops, &mut rng));
        }

        let estimated_cost = estimate_cost(&days, request.party_size);
        let plan = ItineraryPlan {
            total_days: days.len(),
            days,
            estimated_cost,
        };

        info!(
            days = plan.total_days,
            candidates = pois.len(),
            visits = used.len(),
            distance_km = plan.total_distance(),
            "planned itinerary"
        );
        Ok(plan)
    }

    /// Plan and wrap the result as an unsaved itinerary record.
    pub fn create_itinerary(&self, request: &PlanRequest) -> Result<Itinerary, PlanError> {
        let plan = self.plan_itinerary(request)?;
        Ok(Itinerary::from_plan(request, plan))
    }

    fn plan_day(&self, date: Date, stops: Vec<Stop>, rng: &mut ChaCha8Rng) -> DayRoute {
        let seed_route = Route::new(stops);
        let include_return_leg = self.config.include_return_leg;

        match seed_route.interior().len() {
            0 => {
                warn!(%date, "no point of interest fits this day");
                day_route(date, seed_route, DayStatus::Empty, include_return_leg)
            }
            1 => day_route(date, seed_route, DayStatus::Direct, include_return_leg),
            _ => match GeneticOptimizer::new(&seed_route.stops, &self.config).run(rng) {
                Ok(outcome) => DayRoute {
                    date,
                    distance: outcome.distance,
                    route: outcome.route,
                    status: DayStatus::Optimized,
                },
                Err(err) => {
                    warn!(%date, error = %err, "keeping seed order");
                    day_route(date, seed_route, DayStatus::SeedFallback, include_return_leg)
                }
            },
        }
    }

    /// Rebuild edited days of an existing itinerary.
    ///
    /// Edited stops are wrapped in the itinerary's anchor and timed on the
    /// planner grid. Days not named in `edits` are returned untouched. A
    /// catalog POI may appear once across the whole itinerary, edited days
    /// included.
    #[instrument(skip_all, level = "debug", fields(mode = ?mode, edits = edits.len()))]
    pub fn recompute_itinerary(
        &self,
        itinerary: &Itinerary,
        edits: &[EditedDay],
        mode: RecomputeMode,
    ) -> Result<RecomputeOutcome, PlanError> {
        let mut edited_indices: HashSet<usize> = HashSet::new();
        let mut rebuilt = Vec::with_capacity(edits.len());
        for edit in edits {
            let Some(current) = itinerary.days.get(edit.day_index) else {
                return Err(PlanError::InvalidRequest(format!(
                    "day index {} outside itinerary of {} days",
                    edit.day_index,
                    itinerary.days.len()
                )));
            };
            if !edited_indices.insert(edit.day_index) {
                return Err(PlanError::InvalidRequest(format!(
                    "day index {} edited more than once",
                    edit.day_index
                )));
            }
            let route = self.rebuild_route(itinerary, current.date, &edit.stops)?;
            rebuilt.push((edit.day_index, current.date, route));
        }

        let mut seen: HashSet<PoiId> = itinerary
            .days
            .iter()
            .enumerate()
            .filter(|(index, _)| !edited_indices.contains(index))
            .flat_map(|(_, day)| day.poi_ids())
            .collect();
        for (_, _, route) in &rebuilt {
            for stop in route.interior() {
                if let Some(id) = stop.poi_id() {
                    if !seen.insert(id) {
                        return Err(PlanError::InvalidRequest(format!(
                            "{} ({id}) is used more than once",
                            stop.name()
                        )));
                    }
                }
            }
        }

        let mut days = itinerary.days.clone();
        let mut infeasible_stops = Vec::new();
        for (day_index, date, route) in rebuilt {
            let day = match mode {
                RecomputeMode::Generate => {
                    let mut rng = day_rng(itinerary.seed, day_index);
                    self.regenerate_day(date, route, &mut rng)?
                }
                RecomputeMode::Update | RecomputeMode::CheckOnly => {
                    day_route(date, route, DayStatus::Edited, self.config.include_return_leg)
                }
            };

            infeasible_stops.extend(self.infeasible_stops(&day.route));
            days[day_index] = day;
        }

        if mode == RecomputeMode::CheckOnly && !infeasible_stops.is_empty() {
            days = itinerary.days.clone();
        }

        info!(
            days = days.len(),
            infeasible = infeasible_stops.len(),
            "recomputed itinerary"
        );
        Ok(RecomputeOutcome {
            days,
            infeasible_stops,
        })
    }

    /// Recompute a stored itinerary and save the result.
    ///
    /// A `CheckOnly` run that finds infeasible stops leaves the record as is.
    pub fn recompute_stored<S: ItineraryStore + ?Sized>(
        &self,
        store: &S,
        id: ItineraryId,
        edits: &[EditedDay],
        mode: RecomputeMode,
    ) -> Result<RecomputeOutcome, PlanError> {
        let mut itinerary = store.get(id).ok_or(PlanError::UnknownItinerary(id))?;
        let outcome = self.recompute_itinerary(&itinerary, edits, mode)?;

        if mode != RecomputeMode::CheckOnly || outcome.is_feasible() {
            itinerary.replace_days(outcome.days.clone());
            store.put(itinerary);
            debug!(%id, "stored recomputed itinerary");
        }
        Ok(outcome)
    }

    fn rebuild_route(
        &self,
        itinerary: &Itinerary,
        date: Date,
        edited: &[EditedStop],
    ) -> Result<Route, PlanError> {
        let weekday = date.weekday();
        let placeholder = ActiveTime::new(0, 0);
        let anchor = Stop::anchor(itinerary.anchor_name.clone(), itinerary.anchor, placeholder);

        let mut stops = Vec::with_capacity(edited.len() + 2);
        stops.push(anchor.clone());
        for stop in edited {
            match stop {
                EditedStop::Catalog(id) => {
                    let poi = self.catalog.poi(*id).map_err(|err| match err {
                        CatalogError::Unknown(id) => {
                            PlanError::InvalidRequest(format!("unknown point of interest {id}"))
                        }
                        other => PlanError::Catalog(other),
                    })?;
                    stops.push(Stop::visit(&poi, poi.opening_hours.for_weekday(weekday), placeholder));
                }
                EditedStop::AdHoc {
                    name,
                    latitude,
                    longitude,
                } => {
                    debug!(name = %name, "ad hoc stop in edit");
                    stops.push(Stop::ad_hoc(
                        name.clone(),
                        (*latitude, *longitude),
                        placeholder,
                        vec![OpeningInterval::new(0, MINUTES_PER_DAY)],
                    ));
                }
            }
        }
        stops.push(anchor);

        let mut route = Route::new(stops);
        route.assign_grid_times(&self.config);
        Ok(route)
    }

    fn regenerate_day(
        &self,
        date: Date,
        route: Route,
        rng: &mut ChaCha8Rng,
    ) -> Result<DayRoute, OptimizeError> {
        let status = match route.interior().len() {
            0 => DayStatus::Empty,
            1 => DayStatus::Direct,
            _ => DayStatus::Optimized,
        };
        if status != DayStatus::Optimized {
            return Ok(day_route(date, route, status, self.config.include_return_leg));
        }

        let outcome = GeneticOptimizer::new(&route.stops, &self.config).run(rng)?;
        Ok(DayRoute {
            date,
            distance: outcome.distance,
            route: outcome.route,
            status,
        })
    }

    fn infeasible_stops(&self, route: &Route) -> Vec<String> {
        route
            .interior()
            .iter()
            .filter(|stop| {
                !fits_window(stop.time.open_time, &stop.open_times, self.config.stay_time)
                    || stop.time.close_time > self.config.end_time
            })
            .map(|stop| stop.name().to_string())
            .collect()
    }
}

fn day_route(date: Date, route: Route, status: DayStatus, include_return_leg: bool) -> DayRoute {
    DayRoute {
        date,
        distance: route.total_distance(include_return_leg),
        route,
        status,
    }
}

/// Per-day generator, so each day reproduces on its own.
fn day_rng(seed: u64, day_index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed ^ day_index as u64)
}
