//! Monthly observation series used as model input

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single observation on the model's axis: `ds` (date stamp) and `y` (value)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub ds: NaiveDate,
    pub y: f64,
}

impl Observation {
    pub fn new(ds: NaiveDate, y: f64) -> Self {
        Self { ds, y }
    }
}

/// Chronologically ordered monthly observations
///
/// Dates must be strictly increasing and every value finite. Gaps between
/// months are allowed; models measure time in whole months from the first
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    observations: Vec<Observation>,
}

impl MonthlySeries {
    /// Validate and wrap a list of observations
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        if let Some(bad) = observations.iter().find(|o| !o.y.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Non-finite value at {}",
                bad.ds
            )));
        }

        for pair in observations.windows(2) {
            if pair[1].ds <= pair[0].ds {
                return Err(ForecastError::DataError(format!(
                    "Observations must be strictly increasing by date ({} follows {})",
                    pair[1].ds, pair[0].ds
                )));
            }
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.y).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First observed date
    pub fn start(&self) -> NaiveDate {
        self.observations[0].ds
    }

    /// Last observed date
    pub fn end(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].ds
    }

    /// Month offsets of each observation relative to the first one
    pub fn month_offsets(&self) -> Vec<f64> {
        let start = self.start();
        self.observations
            .iter()
            .map(|o| months_between(start, o.ds) as f64)
            .collect()
    }
}

/// Whole calendar months from `from` to `to` (negative when `to` is earlier)
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

/// First-of-month dates for the `horizon` months following `last`
pub fn future_months(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let anchor = last.with_day(1).ok_or_else(|| {
        ForecastError::DataError(format!("Cannot anchor {} to the first of the month", last))
    })?;

    (1..=horizon)
        .map(|step| {
            u32::try_from(step)
                .ok()
                .and_then(|step| anchor.checked_add_months(Months::new(step)))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Horizon of {} months overflows the calendar",
                        horizon
                    ))
                })
        })
        .collect()
}
