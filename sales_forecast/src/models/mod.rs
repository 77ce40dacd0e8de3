//! Forecasting models for monthly sales series

use crate::error::{ForecastError, Result};
use crate::series::MonthlySeries;
use chrono::NaiveDate;
use std::fmt::Debug;

/// Forecast result containing one predicted value per future month
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Future month dates
    dates: Vec<NaiveDate>,
    /// Point predictions, aligned with `dates`
    values: Vec<f64>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if values.len() != dates.len() {
            return Err(ForecastError::FitError(format!(
                "Values length ({}) doesn't match dates length ({})",
                values.len(),
                dates.len()
            )));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitError(
                "Model produced a non-finite prediction".to_string(),
            ));
        }

        Ok(Self { dates, values })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the forecasted dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of months forecasted
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Iterate `(ds, yhat)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Generate a forecast for the `horizon` months after the training data
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// In-sample fitted values, one per training observation
    fn fitted(&self) -> &[f64];

    /// Last observed date of the training data
    fn last_observed(&self) -> NaiveDate;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a monthly series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel + 'static;

    /// Train the model on a monthly series
    fn train(&self, data: &MonthlySeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub(crate) fn check_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Horizon must be at least one month".to_string(),
        ));
    }
    Ok(())
}

pub mod holt_linear;
pub mod seasonal_trend;
