//! Summary statistics for a selected period

use crate::aggregation::{available_months, available_years, select_period};
use crate::month::Month;
use crate::records::{CanonicalRecord, CanonicalTable};
use std::fmt;

/// A (year, month) selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The same month one year earlier; `None` below `i32::MIN`
    pub fn previous_year(self) -> Option<Self> {
        Some(Self {
            year: self.year.checked_sub(1)?,
            month: self.month,
        })
    }

    /// Latest year and latest calendar month present in the table
    pub fn default_for(table: &CanonicalTable) -> Option<Self> {
        let year = *available_years(table).last()?;
        let month = *available_months(table).last()?;
        Some(Self { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} de {}", self.month, self.year)
    }
}

/// Headline figures for a period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: Period,
    pub rows: usize,
    pub total: u64,
    pub mean: f64,
    /// Change against the same month of the previous year, in percent.
    /// Absent when the previous year sold nothing in that month.
    pub yoy_change_pct: Option<f64>,
}

/// How advertised rows compare with non-advertised rows in a period
#[derive(Debug, Clone, PartialEq)]
pub enum AdvertisingInsight {
    /// Mean sales with advertising minus mean sales without
    Difference { units: f64, percent: f64 },
    /// The non-advertised mean is zero, so no relative change exists
    NoBaseline,
    /// One of the two groups is empty
    InsufficientData,
}

fn total(records: &[&CanonicalRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.vendas))
}

fn mean(records: &[&CanonicalRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(total(records) as f64 / records.len() as f64)
}

/// Summarize a period; `None` when the selection holds no rows
pub fn summarize(table: &CanonicalTable, period: Period) -> Option<PeriodSummary> {
    let rows = select_period(table, period.year, period.month);
    let mean = mean(&rows)?;
    let current = total(&rows);

    let previous = period
        .previous_year()
        .map_or(0, |prev| total(&select_period(table, prev.year, prev.month)));
    let yoy_change_pct = (previous > 0)
        .then(|| (current as f64 - previous as f64) / previous as f64 * 100.0);

    Some(PeriodSummary {
        period,
        rows: rows.len(),
        total: current,
        mean,
        yoy_change_pct,
    })
}

/// Compare advertised and non-advertised rows of a period
pub fn advertising_insight(table: &CanonicalTable, period: Period) -> AdvertisingInsight {
    let rows = select_period(table, period.year, period.month);
    let (with_ads, without_ads): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.has_advertising());

    let (Some(with_mean), Some(without_mean)) = (mean(&with_ads), mean(&without_ads)) else {
        return AdvertisingInsight::InsufficientData;
    };

    if without_mean == 0.0 {
        return AdvertisingInsight::NoBaseline;
    }

    let units = with_mean - without_mean;
    AdvertisingInsight::Difference {
        units,
        percent: units / without_mean * 100.0,
    }
}

impl fmt::Display for AdvertisingInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvertisingInsight::Difference { units, percent } => write!(
                f,
                "Sales with advertising were {:.1}% ({:.0} units) {} than without",
                percent.abs(),
                units.abs(),
                if *units >= 0.0 { "higher" } else { "lower" }
            ),
            AdvertisingInsight::NoBaseline => {
                f.write_str("Not enough non-advertised sales to compare against")
            }
            AdvertisingInsight::InsufficientData => {
                f.write_str("Not enough data to compare advertised and non-advertised sales")
            }
        }
    }
}
