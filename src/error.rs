//! Error types.

use thiserror::Error;

use crate::models::ProcessId;
use crate::validation::ValidationError;

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
///
/// Scheduling and playback are total and never fail; errors only come
/// from lookups by id, ID exhaustion, imports, configuration, and JSON
/// encoding.
#[derive(Error, Debug)]
pub enum Error {
    #[error("process {id} not found")]
    ProcessNotFound { id: ProcessId },

    #[error("process id space exhausted")]
    IdSpaceExhausted,

    #[error("invalid process list: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
