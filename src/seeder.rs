//! Greedy nearest-neighbor construction of one day's seed sequence.
//!
//! At every transit slot the walk takes the closest unused POI that is open
//! for the whole stay. There is no lookahead; the genetic optimizer reorders
//! the result afterwards.

use std::collections::HashSet;

use jiff::civil::Weekday;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::haversine::haversine_km;
use crate::hours::{fits_window, ActiveTime};
use crate::poi::{Poi, PoiId};
use crate::tour::Stop;

/// Seed sequence of one day plus what it consumed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySeed {
    /// `[anchor, ...visits, anchor]`.
    pub stops: Vec<Stop>,
    /// POIs placed on this day, in visiting order.
    pub used: Vec<PoiId>,
}

impl DaySeed {
    pub fn interior_count(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }

    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.stops.iter().map(Stop::coordinates).collect()
    }
}

/// Build the seed sequence for `weekday`, skipping every POI in `already_used`.
pub fn seed_day(
    anchor: &Stop,
    weekday: Weekday,
    catalog: &[Poi],
    already_used: &HashSet<PoiId>,
    config: &PlannerConfig,
) -> DaySeed {
    let stay = config.stay_time;
    let mut clock = config.start_time;
    let mut current = anchor.coordinates();

    let mut opening = anchor.clone();
    opening.time = ActiveTime::new(clock, clock);
    let mut stops = vec![opening];
    let mut used = Vec::new();
    let mut used_today: HashSet<PoiId> = HashSet::new();

    while clock + stay < config.end_time {
        clock += config.transit_allowance;
        if !config.departs_by_end(clock) {
            break;
        }

        let mut best: Option<(&Poi, f64)> = None;
        for poi in catalog {
            if already_used.contains(&poi.id) || used_today.contains(&poi.id) {
                continue;
            }
            if !fits_window(clock, poi.opening_hours.for_weekday(weekday), stay) {
                continue;
            }
            let distance = haversine_km(current, poi.coordinates());
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((poi, distance));
            }
        }

        if let Some((poi, _)) = best {
            let time = ActiveTime::new(clock, clock + stay);
            stops.push(Stop::visit(poi, poi.opening_hours.for_weekday(weekday), time));
            clock += stay;
            current = poi.coordinates();
            used_today.insert(poi.id);
            used.push(poi.id);
        }
    }

    let mut closing = anchor.clone();
    closing.time = ActiveTime::new(clock, clock);
    stops.push(closing);

    debug!(
        weekday = ?weekday,
        visits = used.len(),
        end_clock = clock,
        "seeded day"
    );

    DaySeed { stops, used }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::{OpeningHours, OpeningInterval};

    fn anchor() -> Stop {
        Stop::anchor("Hotel", (36.10, -115.17), ActiveTime::new(0, 0))
    }

    fn open_poi(id: u64, lat: f64, lng: f64) -> Poi {
        Poi::new(id, format!("poi-{id}"), lat, lng).with_hours(OpeningHours::always_open())
    }

    #[test]
    fn test_picks_nearest_feasible_first() {
        let catalog = vec![open_poi(1, 36.20, -115.17), open_poi(2, 36.11, -115.17)];
        let seed = seed_day(
            &anchor(),
            Weekday::Monday,
            &catalog,
            &HashSet::new(),
            &PlannerConfig::default(),
        );
        assert_eq!(seed.used, vec![PoiId(2), PoiId(1)]);
        assert_eq!(seed.stops[1].time, ActiveTime::new(450, 570));
        assert_eq!(seed.stops[2].time, ActiveTime::new(600, 720));
    }

    #[test]
    fn test_anchors_wrap_the_day() {
        let catalog = vec![open_poi(1, 36.20, -115.17)];
        let seed = seed_day(
            &anchor(),
            Weekday::Monday,
            &catalog,
            &HashSet::new(),
            &PlannerConfig::default(),
        );
        let first = seed.stops.first().map(Stop::coordinates);
        let last = seed.stops.last().map(Stop::coordinates);
        assert_eq!(first, Some(anchor().coordinates()));
        assert_eq!(last, Some(anchor().coordinates()));
        assert_eq!(seed.stops[0].time.open_time, 420);
        // Clock ran to the end of the horizon in empty slots.
        assert!(seed.stops[2].time.open_time + 120 >= 1350);
        assert_eq!(seed.interior_count(), 1);
    }

    #[test]
    fn test_skips_already_used() {
        let catalog = vec![open_poi(1, 36.11, -115.17), open_poi(2, 36.12, -115.17)];
        let used = HashSet::from([PoiId(1)]);
        let seed = seed_day(&anchor(), Weekday::Monday, &catalog, &used, &PlannerConfig::default());
        assert_eq!(seed.used, vec![PoiId(2)]);
    }

    #[test]
    fn test_waits_for_opening() {
        // Opens at 10:00; the first slots are skipped until it admits a stay.
        let hours = OpeningHours::daily(vec![OpeningInterval::new(600, 900)]);
        let catalog = vec![Poi::new(1, "late", 36.11, -115.17).with_hours(hours)];
        let seed = seed_day(
            &anchor(),
            Weekday::Monday,
            &catalog,
            &HashSet::new(),
            &PlannerConfig::default(),
        );
        assert_eq!(seed.stops[1].time, ActiveTime::new(600, 720));
    }

    #[test]
    fn test_closed_weekday_yields_no_visits() {
        let hours = OpeningHours::always_open().with_day(Weekday::Sunday, Vec::new());
        let catalog = vec![Poi::new(1, "weekday-only", 36.11, -115.17).with_hours(hours)];
        let seed = seed_day(
            &anchor(),
            Weekday::Sunday,
            &catalog,
            &HashSet::new(),
            &PlannerConfig::default(),
        );
        assert_eq!(seed.stops.len(), 2);
        assert!(seed.used.is_empty());
    }

    #[test]
    fn test_last_visit_departs_by_end_of_day() {
        // 20 minute stays: after 18 visits the clock is 22:00, and the next
        // slot (22:30) would depart at 22:50.
        let catalog: Vec<Poi> = (0..25)
            .map(|id| open_poi(id, 36.11 + id as f64 * 0.001, -115.17))
            .collect();
        let config = PlannerConfig::default().with_stay_time(20);
        let seed = seed_day(&anchor(), Weekday::Monday, &catalog, &HashSet::new(), &config);
        assert_eq!(seed.interior_count(), 18);
        for stop in &seed.stops[1..seed.stops.len() - 1] {
            assert!(stop.time.close_time <= config.end_time, "{:?}", stop.time);
        }
    }

    #[test]
    fn test_stops_carry_weekday_intervals() {
        let hours = OpeningHours::always_open()
            .with_day(Weekday::Tuesday, vec![OpeningInterval::new(420, 1000)]);
        let catalog = vec![Poi::new(1, "museum", 36.11, -115.17).with_hours(hours)];
        let seed = seed_day(
            &anchor(),
            Weekday::Tuesday,
            &catalog,
            &HashSet::new(),
            &PlannerConfig::default(),
        );
        assert_eq!(seed.stops[1].open_times, vec![OpeningInterval::new(420, 1000)]);
    }
}
