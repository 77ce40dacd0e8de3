//! # Sales Forecast
//!
//! Short-horizon projection of monthly sales totals.
//!
//! Input is a [`MonthlySeries`] of `(ds, y)` observations; a trained model
//! extends the date axis month by month and yields one point prediction per
//! future month.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_forecast::models::seasonal_trend::SeasonalTrend;
//! use sales_forecast::models::{ForecastModel, TrainedForecastModel};
//! use sales_forecast::{MonthlySeries, Observation};
//!
//! let observations = (1..=6)
//!     .map(|m| Observation::new(NaiveDate::from_ymd_opt(2023, m, 1).unwrap(), 100.0 + m as f64))
//!     .collect();
//! let series = MonthlySeries::new(observations)?;
//!
//! let trained = SeasonalTrend::new().train(&series)?;
//! let forecast = trained.forecast(3)?;
//! assert_eq!(forecast.horizon(), 3);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod error;
pub mod models;
pub mod series;

pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::series::{MonthlySeries, Observation};
