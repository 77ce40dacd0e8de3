//! Error types for the sales_forecast crate

use thiserror::Error;

/// Errors raised while building a series or fitting a model
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The input series is unusable (empty, unordered, non-finite)
    #[error("Data error: {0}")]
    DataError(String),

    /// The model could not be fitted to the series
    #[error("Fit error: {0}")]
    FitError(String),

    /// A model or forecast parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
