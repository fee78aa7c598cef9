//! Traffic error type.

use thiserror::Error;

/// Construction-time validation failures for traffic inputs.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("rate curve needs at least one segment")]
    EmptyCurve,

    #[error("invalid rate segment: {0}")]
    InvalidSegment(String),

    #[error("route needs at least one destination")]
    EmptyRoute,

    #[error("destination stay must be >= 0, got {0}")]
    NegativeStay(f64),

    #[error(transparent)]
    Building(#[from] ev_building::BuildingError),
}

/// Shorthand result type for `ev-traffic`.
pub type TrafficResult<T> = Result<T, TrafficError>;
