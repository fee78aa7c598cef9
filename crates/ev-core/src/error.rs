//! Core error type.
//!
//! Sub-crates define their own error enums and either wrap `CoreError` as a
//! variant or convert via `From`.  Input-validity failures (bad config, bad
//! constructor arguments) are reported through these types at construction;
//! invariant violations inside a running tick are programmer errors and
//! panic instead.

use thiserror::Error;

/// The top-level error type for `ev-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
