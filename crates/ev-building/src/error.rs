//! Building-model error type.

use ev_core::VehicleId;
use thiserror::Error;

/// Errors raised at construction of building-model types.
#[derive(Debug, Error)]
pub enum BuildingError {
    #[error("floor count must be >= 1")]
    EmptyBuilding,

    #[error("floor {floor} out of range (building has {count} floors)")]
    FloorOutOfRange { floor: u32, count: u32 },

    #[error("vehicle id must be positive, got {0}")]
    InvalidVehicleId(VehicleId),

    #[error("vehicle {0} capacity must be >= 1")]
    InvalidCapacity(VehicleId),
}

/// Shorthand result type for `ev-building`.
pub type BuildingResult<T> = Result<T, BuildingError>;
