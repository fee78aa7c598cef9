//! Controller error type.

use thiserror::Error;

/// Errors surfaced by the controller tick.
///
/// Anything here indicates a broken precondition (e.g. a call referencing a
/// floor outside the building); recoverable operational anomalies are domain
/// events, not errors.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Building(#[from] ev_building::BuildingError),
}

/// Shorthand result type for `ev-control`.
pub type ControlResult<T> = Result<T, ControlError>;
