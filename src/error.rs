//! Engine error types.
//!
//! Business infeasibility (no skilled resource, no free slot) is reported
//! inside results, never as an error. Errors are reserved for malformed
//! input and configuration.

use crate::validation::ValidationError;

/// Errors raised at the edges of the engines.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Input records failed structural validation.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Configuration JSON could not be parsed.
    #[error("malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for fallible engine entry points.
pub type EngineResult<T> = Result<T, EngineError>;
