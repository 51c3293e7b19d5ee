//! Planner configuration and the calibrated optimizer parameter table.

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, PlanError};

/// Parameters of one genetic optimizer run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaParams {
    pub mutation_rate: f64,
    pub num_generations: usize,
    pub population_size: usize,
    pub num_elites: usize,
}

impl GaParams {
    pub const fn new(
        mutation_rate: f64,
        num_generations: usize,
        population_size: usize,
        num_elites: usize,
    ) -> Self {
        Self {
            mutation_rate,
            num_generations,
            population_size,
            num_elites,
        }
    }

    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.population_size == 0 {
            return Err(OptimizeError::InvalidParams(
                "population size must be positive".to_string(),
            ));
        }
        if self.num_elites > self.population_size {
            return Err(OptimizeError::InvalidParams(format!(
                "elite count {} exceeds population size {}",
                self.num_elites, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptimizeError::InvalidParams(format!(
                "mutation rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        Ok(())
    }
}

/// Hand-tuned parameters keyed by interior stop count.
///
/// Small permutation spaces get tiny populations so that rejection sampling
/// terminates quickly. Counts past the table use `fallback`; counts below
/// `first_interior_count` use the first row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaParamTable {
    pub first_interior_count: usize,
    pub rows: Vec<GaParams>,
    pub fallback: GaParams,
}

impl Default for GaParamTable {
    fn default() -> Self {
        Self {
            first_interior_count: 3,
            rows: vec![
                GaParams::new(0.01, 3, 4, 1),   // 3
                GaParams::new(0.01, 5, 8, 2),   // 4
                GaParams::new(0.01, 8, 12, 4),  // 5
                GaParams::new(0.01, 10, 20, 6), // 6
                GaParams::new(0.01, 15, 30, 10),
                GaParams::new(0.01, 20, 40, 14),
                GaParams::new(0.01, 25, 50, 18),
                GaParams::new(0.01, 30, 60, 22),
                GaParams::new(0.01, 40, 80, 30), // 11
            ],
            fallback: GaParams::new(0.005, 50, 100, 50),
        }
    }
}

impl GaParamTable {
    pub fn for_interior_count(&self, interior: usize) -> GaParams {
        let offset = interior.saturating_sub(self.first_interior_count);
        self.rows.get(offset).copied().unwrap_or(self.fallback)
    }

    pub fn validate(&self) -> Result<(), OptimizeError> {
        self.rows
            .iter()
            .chain(std::iter::once(&self.fallback))
            .try_for_each(GaParams::validate)
    }
}

/// Planning horizon, visit timing and optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// First arrival slot of the day (minutes since midnight).
    pub start_time: i32,
    /// Latest departure of the day (minutes since midnight).
    pub end_time: i32,
    /// Minutes spent at every stop.
    pub stay_time: i32,
    /// Fixed transit minutes added before every arrival.
    pub transit_allowance: i32,
    /// Count the leg into the closing anchor in route distance.
    pub include_return_leg: bool,
    /// Retry cap of each rejection-sampling loop.
    pub max_attempts: usize,
    /// Rank generations on the rayon pool.
    pub parallel_ranking: bool,
    pub params: GaParamTable,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start_time: 420,
            end_time: 1350,
            stay_time: 120,
            transit_allowance: 30,
            include_return_leg: false,
            max_attempts: 10_000,
            parallel_ranking: true,
            params: GaParamTable::default(),
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration, filling omitted fields from the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PlanError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| PlanError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_stay_time(mut self, stay_time: i32) -> Self {
        self.stay_time = stay_time;
        self
    }

    /// Whether a visit arriving at `arrival` departs by the end of the day.
    pub fn departs_by_end(&self, arrival: i32) -> bool {
        arrival + self.stay_time <= self.end_time
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.start_time < 0 || self.end_time <= self.start_time {
            return Err(PlanError::InvalidConfig(format!(
                "planning horizon {}..{} is empty",
                self.start_time, self.end_time
            )));
        }
        if self.stay_time < 0 || self.transit_allowance <= 0 {
            return Err(PlanError::InvalidConfig(
                "stay time must be non-negative and transit allowance positive".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(PlanError::InvalidConfig("max_attempts must be positive".to_string()));
        }
        self.params.validate()?;
        Ok(())
    }
}
