//! Error types for planning, optimization and catalog access.

use std::fmt;

use thiserror::Error;

use crate::poi::PoiId;
use crate::store::ItineraryId;

/// Failures of the external POI catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unknown point of interest {0}")]
    Unknown(PoiId),
}

/// Which rejection-sampling loop ran out of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingStage {
    Initialization,
    Crossover,
    Mutation,
}

impl fmt::Display for SamplingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialization => "population initialization",
            Self::Crossover => "crossover",
            Self::Mutation => "mutation",
        };
        f.write_str(name)
    }
}

/// Failures of the genetic optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    #[error("no time-feasible ordering found during {stage} after {attempts} attempts")]
    ExhaustedRejectionSampling { stage: SamplingStage, attempts: usize },
    #[error("invalid optimizer parameters: {0}")]
    InvalidParams(String),
}

/// Request-level failures of the itinerary planner.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("no time-feasible ordering found during {stage} after {attempts} attempts")]
    ExhaustedRejectionSampling { stage: SamplingStage, attempts: usize },
    #[error("edited route violates opening hours at: {}", stops.join(", "))]
    InfeasibleEdit { stops: Vec<String> },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown itinerary {0}")]
    UnknownItinerary(ItineraryId),
}

impl From<OptimizeError> for PlanError {
    fn from(err: OptimizeError) -> Self {
        match err {
            OptimizeError::ExhaustedRejectionSampling { stage, attempts } => {
                PlanError::ExhaustedRejectionSampling { stage, attempts }
            }
            OptimizeError::InvalidParams(message) => PlanError::InvalidConfig(message),
        }
    }
}
