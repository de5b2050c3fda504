//! HPO error types

use thiserror::Error;

/// Errors from hyperparameter search.
#[derive(Debug, Error)]
pub enum HpoError {
    #[error("parameter not found in configuration: {0}")]
    ParameterNotFound(String),

    #[error("invalid value for parameter '{0}': {1}")]
    InvalidValue(String, String),

    #[error("search space is empty")]
    EmptySpace,

    #[error("search produced no completed trials")]
    NoCompletedTrials,

    #[error("objective failed: {0}")]
    Objective(String),
}

/// Result alias for HPO operations.
pub type Result<T> = std::result::Result<T, HpoError>;
