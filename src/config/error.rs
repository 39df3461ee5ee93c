//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Weighting base must be greater than 1")]
    InvalidWeightBase,

    #[error("Retrieval gate must draw from at least one claim")]
    InvalidGateTopN,

    #[error("Tie-break pool needs at least two candidates")]
    InvalidTieBreakPool,

    #[error("Invalid request timeout")]
    InvalidTimeout,
}
