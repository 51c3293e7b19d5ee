//! itinerary-planner core
//!
//! Multi-day visit planning over a catalog of points of interest with
//! per-weekday opening hours: greedy day seeding followed by a genetic
//! reordering of each day under hard time windows.

pub mod traits;
pub mod catalog;
pub mod store;
pub mod config;
pub mod error;
pub mod haversine;
pub mod hours;
pub mod poi;
pub mod tour;
pub mod seeder;
pub mod genetic;
pub mod itinerary;
pub mod planner;
pub mod polyline;

pub use config::PlannerConfig;
pub use error::PlanError;
pub use planner::Planner;
