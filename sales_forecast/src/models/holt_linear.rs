//! Holt's linear (double) exponential smoothing

use crate::error::{ForecastError, Result};
use crate::models::{check_horizon, ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::{future_months, MonthlySeries};
use chrono::NaiveDate;

/// Double exponential smoothing model with level and trend components
#[derive(Debug, Clone)]
pub struct HoltLinear {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
}

/// Trained Holt linear model
#[derive(Debug, Clone)]
pub struct TrainedHoltLinear {
    name: String,
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
    last_observed: NaiveDate,
}

impl HoltLinear {
    /// Create a new Holt linear model
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Alpha must be between 0 and 1".to_string(),
            ));
        }
        if beta <= 0.0 || beta >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Beta must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt Linear (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl ForecastModel for HoltLinear {
    type Trained = TrainedHoltLinear;

    fn train(&self, data: &MonthlySeries) -> Result<Self::Trained> {
        let values = data.values();
        if values.len() < 2 {
            return Err(ForecastError::FitError(format!(
                "{} needs at least 2 observations, got {}",
                self.name,
                values.len()
            )));
        }

        let mut level = values[0];
        let mut trend = values[1] - values[0];
        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(values[0]);

        for &value in &values[1..] {
            // One-step-ahead prediction before absorbing the observation
            fitted.push(level + trend);

            let previous_level = level;
            level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
        }

        if !level.is_finite() || !trend.is_finite() {
            return Err(ForecastError::FitError(
                "Smoothing diverged to a non-finite state".to_string(),
            ));
        }

        Ok(TrainedHoltLinear {
            name: self.name.clone(),
            level,
            trend,
            fitted,
            last_observed: data.end(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltLinear {
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }
}

impl TrainedForecastModel for TrainedHoltLinear {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        check_horizon(horizon)?;

        let dates = future_months(self.last_observed, horizon)?;
        let values = (1..=horizon)
            .map(|step| self.level + step as f64 * self.trend)
            .collect();

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
