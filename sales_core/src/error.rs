//! Error types for the sales_core crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_core crate
#[derive(Debug, Error)]
pub enum SalesError {
    /// A required column is absent from the raw batch
    #[error("Schema error: required column '{0}' not found")]
    Schema(String),

    /// Unexpected failure while canonicalizing a batch
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Snapshot write, scan or removal failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Model training or prediction failure
    #[error("Fit error: {0}")]
    Fit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid or missing configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Failure reading the raw source
    #[error("Source error: {0}")]
    Source(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV encoding or decoding
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesError>;

impl From<PolarsError> for SalesError {
    fn from(err: PolarsError) -> Self {
        SalesError::Polars(err.to_string())
    }
}

impl From<rusqlite::Error> for SalesError {
    fn from(err: rusqlite::Error) -> Self {
        SalesError::Source(err.to_string())
    }
}

#[cfg(feature = "forecast")]
impl From<sales_forecast::ForecastError> for SalesError {
    fn from(err: sales_forecast::ForecastError) -> Self {
        match err {
            sales_forecast::ForecastError::InvalidParameter(msg) => SalesError::InvalidParameter(msg),
            other => SalesError::Fit(other.to_string()),
        }
    }
}
