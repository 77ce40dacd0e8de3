//! Optional sales forecasting
//!
//! Whether forecasting exists is decided when the crate is built: with the
//! `forecast` feature [`ForecastCapability::detect`] yields an
//! [`ForecastAdapter`]; without it the capability is always
//! [`ForecastCapability::Unavailable`]. The types below are the same in both
//! builds, so callers never need their own `cfg` switches.

use crate::aggregation::AggregatedPoint;
use crate::error::{Result, SalesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "forecast")]
mod adapter;

#[cfg(feature = "forecast")]
pub use adapter::ForecastAdapter;

/// Predicted sales for one future month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
}

/// Result of a forecast request
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastOutcome {
    /// One point per requested month, in date order
    Projected(Vec<ForecastPoint>),
    /// Forecasting is not part of this build or deployment
    Unavailable,
    /// There is no observed series to forecast from
    NoData,
}

/// Which model backs the forecast
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ModelKind {
    /// Linear trend plus month-of-year offsets
    #[default]
    SeasonalTrend,
    /// Holt's double exponential smoothing
    HoltLinear { alpha: f64, beta: f64 },
}

impl FromStr for ModelKind {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seasonal" | "seasonal_trend" => Ok(ModelKind::SeasonalTrend),
            "holt" | "holt_linear" => Ok(ModelKind::HoltLinear {
                alpha: 0.5,
                beta: 0.3,
            }),
            other => Err(SalesError::Config(format!(
                "unknown forecast model '{}'",
                other
            ))),
        }
    }
}

/// Longest horizon accepted by the reporting layer
pub const MAX_HORIZON_MONTHS: usize = 12;

/// Forecasting, present or absent
#[derive(Debug)]
pub enum ForecastCapability {
    #[cfg(feature = "forecast")]
    Available(ForecastAdapter),
    Unavailable,
}

impl ForecastCapability {
    /// The capability this build supports, configured with `kind`
    pub fn detect(kind: ModelKind) -> Self {
        #[cfg(feature = "forecast")]
        {
            ForecastCapability::Available(ForecastAdapter::new(kind))
        }
        #[cfg(not(feature = "forecast"))]
        {
            let _ = kind;
            ForecastCapability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, ForecastCapability::Unavailable)
    }

    /// Fit (or reuse) a model for `series` and project `horizon` months.
    ///
    /// Never attempts a fit when unavailable. An empty series yields
    /// [`ForecastOutcome::NoData`]; fit failures are errors.
    pub fn forecast(&self, series: &[AggregatedPoint], horizon: usize) -> Result<ForecastOutcome> {
        match self {
            #[cfg(feature = "forecast")]
            ForecastCapability::Available(adapter) => {
                if series.is_empty() {
                    return Ok(ForecastOutcome::NoData);
                }
                let model = adapter.fit(series)?;
                let points = adapter.predict(model.as_ref(), horizon)?;
                Ok(ForecastOutcome::Projected(points))
            }
            ForecastCapability::Unavailable => {
                let _ = (series, horizon);
                Ok(ForecastOutcome::Unavailable)
            }
        }
    }
}
