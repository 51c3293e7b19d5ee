//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data including:
//! - Real Las Vegas / Henderson places with categories, prices and hours
//! - A builder for one-off POIs

pub mod las_vegas_pois;

pub use las_vegas_pois::*;
