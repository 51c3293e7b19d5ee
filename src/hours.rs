//! Opening hours and planned visit times.
//!
//! All clock values are minutes since local midnight in `[0, 1440]`.
//! Intervals spanning midnight are not modeled; each weekday stands alone.

use jiff::civil::Weekday;
use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i32 = 1440;

/// A single open/close interval of a POI on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningInterval {
    pub open: i32,
    pub close: i32,
}

impl OpeningInterval {
    pub const fn new(open: i32, close: i32) -> Self {
        Self { open, close }
    }

    /// Whether a visit arriving at `arrival` and staying `stay_minutes` fits.
    pub fn admits(&self, arrival: i32, stay_minutes: i32) -> bool {
        self.open <= arrival && arrival + stay_minutes <= self.close
    }
}

/// Weekly opening schedule, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    days: [Vec<OpeningInterval>; 7],
}

impl OpeningHours {
    /// A schedule with no open interval on any day.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Open for the whole day, every day.
    pub fn always_open() -> Self {
        Self::daily(vec![OpeningInterval::new(0, MINUTES_PER_DAY)])
    }

    /// The same intervals on every weekday.
    pub fn daily(intervals: Vec<OpeningInterval>) -> Self {
        Self {
            days: std::array::from_fn(|_| intervals.clone()),
        }
    }

    /// Replace the intervals of one weekday.
    pub fn with_day(mut self, weekday: Weekday, intervals: Vec<OpeningInterval>) -> Self {
        self.days[day_index(weekday)] = intervals;
        self
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &[OpeningInterval] {
        &self.days[day_index(weekday)]
    }
}

fn day_index(weekday: Weekday) -> usize {
    match weekday {
        Weekday::Monday => 0,
        Weekday::Tuesday => 1,
        Weekday::Wednesday => 2,
        Weekday::Thursday => 3,
        Weekday::Friday => 4,
        Weekday::Saturday => 5,
        Weekday::Sunday => 6,
    }
}

/// Planned arrival and departure of one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTime {
    pub open_time: i32,
    pub close_time: i32,
}

impl ActiveTime {
    pub const fn new(open_time: i32, close_time: i32) -> Self {
        Self {
            open_time,
            close_time,
        }
    }
}

/// True iff some interval contains the whole visit `[arrival, arrival + stay]`.
///
/// An empty interval list is never feasible.
pub fn fits_window(arrival: i32, intervals: &[OpeningInterval], stay_minutes: i32) -> bool {
    intervals
        .iter()
        .any(|interval| interval.admits(arrival, stay_minutes))
}

/// Render minutes since midnight as `HH:MM`.
///
/// Times past midnight keep counting hours (`1470` is `24:30`). Negative
/// input renders as `00:00`.
pub fn format_minutes(minutes: i32) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_boundaries() {
        let intervals = [OpeningInterval::new(540, 1020)];
        assert!(fits_window(540, &intervals, 120));
        assert!(fits_window(900, &intervals, 120));
        assert!(!fits_window(901, &intervals, 120));
        assert!(!fits_window(539, &intervals, 120));
    }

    #[test]
    fn test_no_intervals_never_fits() {
        assert!(!fits_window(600, &[], 0));
    }

    #[test]
    fn test_any_interval_may_admit() {
        // Split lunch closure: morning too short, afternoon fits.
        let intervals = [OpeningInterval::new(480, 600), OpeningInterval::new(780, 1080)];
        assert!(!fits_window(500, &intervals, 120));
        assert!(fits_window(800, &intervals, 120));
    }

    #[test]
    fn test_weekday_lookup() {
        let hours = OpeningHours::daily(vec![OpeningInterval::new(600, 1200)])
            .with_day(Weekday::Sunday, Vec::new());
        assert_eq!(hours.for_weekday(Weekday::Monday).len(), 1);
        assert!(hours.for_weekday(Weekday::Sunday).is_empty());
    }

    #[test]
    fn test_always_open_admits_full_day() {
        let hours = OpeningHours::always_open();
        assert!(fits_window(0, hours.for_weekday(Weekday::Friday), MINUTES_PER_DAY));
        assert!(OpeningHours::closed().for_weekday(Weekday::Friday).is_empty());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(420), "07:00");
        assert_eq!(format_minutes(1350), "22:30");
        assert_eq!(format_minutes(5), "00:05");
        assert_eq!(format_minutes(1440), "24:00");
        assert_eq!(format_minutes(1470), "24:30");
        assert_eq!(format_minutes(-10), "00:00");
    }
}
