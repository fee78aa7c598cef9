//! Driver error type.

use thiserror::Error;

/// Anything that can fail while building or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] ev_core::CoreError),

    #[error(transparent)]
    Building(#[from] ev_building::BuildingError),

    #[error(transparent)]
    Control(#[from] ev_control::ControlError),

    #[error(transparent)]
    Traffic(#[from] ev_traffic::TrafficError),

    #[error(transparent)]
    Output(#[from] ev_output::OutputError),
}

/// Shorthand result type for `ev-sim`.
pub type SimResult<T> = Result<T, SimError>;
