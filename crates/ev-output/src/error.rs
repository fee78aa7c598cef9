//! Output error type.

use thiserror::Error;

/// Errors from sinks and pipeline setup.
///
/// Inside the running pipeline these are logged and swallowed; they only
/// propagate from construction (`create`/`spawn`).
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Shorthand result type for `ev-output`.
pub type OutputResult<T> = Result<T, OutputError>;
