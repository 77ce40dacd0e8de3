//! Additive trend + month-of-year seasonality model
//!
//! `y(t) = intercept + slope * t + seasonal[month_of_year]`, where `t` counts
//! calendar months from the first observation. The trend is an ordinary least
//! squares line; seasonal offsets are the mean detrended residual of each
//! calendar month. Both are refined by a fixed number of backfitting passes so
//! the result is deterministic for a given series.

use crate::error::{ForecastError, Result};
use crate::models::{check_horizon, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::{future_months, months_between, MonthlySeries};
use chrono::{Datelike, NaiveDate};
use statrs::statistics::Statistics;

/// Minimum observations before month-of-year offsets are estimated
pub const SEASONAL_MIN_OBSERVATIONS: usize = 12;

const BACKFIT_PASSES: usize = 10;

/// Seasonal trend model
#[derive(Debug, Clone)]
pub struct SeasonalTrend {
    name: String,
    /// Estimate seasonal offsets when enough data is available
    seasonal: bool,
}

/// Trained seasonal trend model
#[derive(Debug, Clone)]
pub struct TrainedSeasonalTrend {
    name: String,
    intercept: f64,
    slope: f64,
    seasonal: [f64; 12],
    start: NaiveDate,
    last_observed: NaiveDate,
    fitted: Vec<f64>,
    residual_std: f64,
}

impl Default for SeasonalTrend {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalTrend {
    pub fn new() -> Self {
        Self {
            name: "Seasonal Trend".to_string(),
            seasonal: true,
        }
    }

    /// Trend-only variant; seasonal offsets stay at zero
    pub fn trend_only() -> Self {
        Self {
            name: "Linear Trend".to_string(),
            seasonal: false,
        }
    }
}

fn least_squares(t: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    let t_mean = t.iter().mean();
    let y_mean = y.iter().mean();

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (&ti, &yi) in t.iter().zip(y) {
        covariance += (ti - t_mean) * (yi - y_mean);
        variance += (ti - t_mean).powi(2);
    }

    if variance == 0.0 {
        return Err(ForecastError::FitError(
            "Observations span a single month; trend is undefined".to_string(),
        ));
    }

    let slope = covariance / variance;
    Ok((y_mean - slope * t_mean, slope))
}

fn month_slot(date: NaiveDate) -> usize {
    date.month0() as usize
}

impl ForecastModel for SeasonalTrend {
    type Trained = TrainedSeasonalTrend;

    fn train(&self, data: &MonthlySeries) -> Result<Self::Trained> {
        if data.len() < 2 {
            return Err(ForecastError::FitError(format!(
                "{} needs at least 2 observations, got {}",
                self.name,
                data.len()
            )));
        }

        let t = data.month_offsets();
        let y = data.values();
        let slots: Vec<usize> = data.observations().iter().map(|o| month_slot(o.ds)).collect();
        let use_seasonality = self.seasonal && data.len() >= SEASONAL_MIN_OBSERVATIONS;

        let mut seasonal = [0.0; 12];
        let (mut intercept, mut slope) = least_squares(&t, &y)?;

        if use_seasonality {
            for _ in 0..BACKFIT_PASSES {
                let mut sums = [0.0; 12];
                let mut counts = [0usize; 12];
                for i in 0..y.len() {
                    sums[slots[i]] += y[i] - (intercept + slope * t[i]);
                    counts[slots[i]] += 1;
                }

                let observed: Vec<usize> = (0..12).filter(|&k| counts[k] > 0).collect();
                for &k in &observed {
                    seasonal[k] = sums[k] / counts[k] as f64;
                }
                let centre = observed.iter().map(|&k| seasonal[k]).mean();
                for &k in &observed {
                    seasonal[k] -= centre;
                }

                let deseasonalized: Vec<f64> =
                    y.iter().zip(&slots).map(|(yi, &k)| yi - seasonal[k]).collect();
                (intercept, slope) = least_squares(&t, &deseasonalized)?;
            }
        }

        let fitted: Vec<f64> = t
            .iter()
            .zip(&slots)
            .map(|(ti, &k)| intercept + slope * ti + seasonal[k])
            .collect();

        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitError(
                "Fitted values are not finite".to_string(),
            ));
        }

        let residual_std = if y.len() > 2 {
            y.iter().zip(&fitted).map(|(a, f)| a - f).std_dev()
        } else {
            0.0
        };

        Ok(TrainedSeasonalTrend {
            name: self.name.clone(),
            intercept,
            slope,
            seasonal,
            start: data.start(),
            last_observed: data.end(),
            fitted,
            residual_std,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalTrend {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Seasonal offsets, January first
    pub fn seasonal_offsets(&self) -> &[f64; 12] {
        &self.seasonal
    }

    /// Standard deviation of in-sample residuals
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    fn value_at(&self, date: NaiveDate) -> f64 {
        let t = months_between(self.start, date) as f64;
        self.intercept + self.slope * t + self.seasonal[month_slot(date)]
    }
}

impl TrainedForecastModel for TrainedSeasonalTrend {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        check_horizon(horizon)?;

        let dates = future_months(self.last_observed, horizon)?;
        let values = dates.iter().map(|&d| self.value_at(d)).collect();

        ForecastResult::new(dates, values)
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    fn name(&self) -> &str {
        &self.name
    }
}
