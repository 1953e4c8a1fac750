//! Error types for portfolio analytics
//!
//! These are contract violations: malformed holdings, badly ordered series,
//! invalid configuration. Documented data shortfalls (too few samples, no
//! holdings) are not errors; they surface as [`crate::Unavailable`] markers.

use thiserror::Error;

/// Errors that can occur while validating inputs or configuration
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Invalid holding {symbol}: {reason}")]
    InvalidHolding { symbol: String, reason: String },

    #[error("Duplicate symbol in snapshot: {0}")]
    DuplicateSymbol(String),

    #[error("Timestamps must be strictly increasing (sample {index} at {timestamp})")]
    NonIncreasingTimestamp { index: usize, timestamp: String },

    #[error("Non-finite value in series at sample {0}")]
    NonFiniteValue(usize),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
