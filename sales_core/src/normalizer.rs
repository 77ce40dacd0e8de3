//! Canonicalization of raw sales batches
//!
//! Turns an untyped [`RawBatch`] into a [`CanonicalTable`]:
//!
//! - **Strict schema**: `Mes`, `Ano` and `Vendas` must exist, otherwise the
//!   whole batch is rejected with [`SalesError::Schema`] and nothing is reported
//! - **Field-level repair**: bad months, sales and flags get deterministic
//!   fallback values and are reported as warnings; rows are never dropped
//! - **No partial output**: any other failure yields an error, never a table

use crate::data::{RawBatch, COL_ANO, COL_MES, COL_PUBLICIDADE, COL_VENDAS};
use crate::error::{Result, SalesError};
use crate::month::Month;
use crate::records::{CanonicalRecord, CanonicalTable};
use crate::reporter::{PipelineEvent, PipelineReporter};
use std::sync::Arc;

/// How a raw sales cell was turned into a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesCoercion {
    Parsed(u64),
    /// Missing, non-numeric or non-finite; became 0
    Defaulted,
    /// Negative; clamped to 0
    Clamped,
}

impl SalesCoercion {
    pub fn value(self) -> u64 {
        match self {
            SalesCoercion::Parsed(v) => v,
            SalesCoercion::Defaulted | SalesCoercion::Clamped => 0,
        }
    }
}

/// Coerce a raw sales value to a non-negative integer, truncating fractions
pub fn coerce_sales(raw: Option<f64>) -> SalesCoercion {
    match raw {
        Some(v) if !v.is_finite() => SalesCoercion::Defaulted,
        Some(v) if v < 0.0 => SalesCoercion::Clamped,
        // `as` saturates at u64::MAX
        Some(v) => SalesCoercion::Parsed(v.trunc() as u64),
        None => SalesCoercion::Defaulted,
    }
}

/// Collapse a raw advertising value to a flag: only exactly 1 means advertised
pub fn coerce_advertising(raw: Option<f64>) -> bool {
    raw == Some(1.0)
}

/// Interpret a raw year; only integral values that fit `i32` are kept
pub fn coerce_year(raw: Option<f64>) -> Option<i32> {
    raw.filter(|v| v.is_finite() && v.fract() == 0.0)
        .filter(|v| *v >= i32::MIN as f64 && *v <= i32::MAX as f64)
        .map(|v| v as i32)
}

/// Canonicalizes raw batches and reports data-quality findings
#[derive(Clone)]
pub struct Normalizer {
    reporter: Arc<dyn PipelineReporter>,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

impl Normalizer {
    pub fn new(reporter: Arc<dyn PipelineReporter>) -> Self {
        Self { reporter }
    }

    /// Normalize a raw batch.
    ///
    /// Returns [`SalesError::Schema`] when a required column is missing. Any
    /// other failure is reported as [`PipelineEvent::NormalizationFailed`] and
    /// returned as [`SalesError::Normalization`].
    pub fn normalize(&self, batch: &RawBatch) -> Result<CanonicalTable> {
        if let Some(column) = batch.missing_required_column() {
            return Err(SalesError::Schema(column.to_string()));
        }

        self.canonicalize(batch).map_err(|err| {
            let reason = err.to_string();
            self.reporter.report(PipelineEvent::NormalizationFailed {
                reason: reason.clone(),
            });
            SalesError::Normalization(reason)
        })
    }

    fn canonicalize(&self, batch: &RawBatch) -> Result<CanonicalTable> {
        let rows = batch.len();

        let months: Vec<Option<Month>> = batch
            .text_column(COL_MES)?
            .iter()
            .map(|raw| raw.as_deref().and_then(Month::repair))
            .collect();
        let years = batch.numeric_column(COL_ANO)?;
        let sales = batch.numeric_column(COL_VENDAS)?;
        let advertising = if batch.has_column(COL_PUBLICIDADE) {
            batch.numeric_column(COL_PUBLICIDADE)?
        } else {
            vec![None; rows]
        };

        let invalid_months = months.iter().filter(|m| m.is_none()).count();
        if invalid_months > 0 {
            self.reporter.report(PipelineEvent::InvalidMonths {
                count: invalid_months,
                fallback: Month::FALLBACK.name(),
            });
        }

        let mut defaulted_sales = 0;
        let mut clamped_sales = 0;
        let mut records = Vec::with_capacity(rows);

        for i in 0..rows {
            let mes = months[i].unwrap_or(Month::FALLBACK);

            let coercion = coerce_sales(sales[i]);
            match coercion {
                SalesCoercion::Defaulted => defaulted_sales += 1,
                SalesCoercion::Clamped => clamped_sales += 1,
                SalesCoercion::Parsed(_) => {}
            }

            records.push(CanonicalRecord::new(
                mes,
                coerce_year(years[i]),
                coercion.value(),
                coerce_advertising(advertising[i]),
            ));
        }

        if defaulted_sales > 0 {
            self.reporter.report(PipelineEvent::SalesCoerced {
                count: defaulted_sales,
            });
        }
        if clamped_sales > 0 {
            self.reporter.report(PipelineEvent::SalesClamped {
                count: clamped_sales,
            });
        }

        let missing_dates = records.iter().filter(|r| r.data.is_none()).count();
        if missing_dates > 0 {
            self.reporter.report(PipelineEvent::DateSynthesisFailed {
                count: missing_dates,
            });
        }

        self.reporter
            .report(PipelineEvent::RowsProcessed { count: records.len() });

        Ok(CanonicalTable::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_sales() {
        assert_eq!(coerce_sales(Some(120.0)), SalesCoercion::Parsed(120));
        assert_eq!(coerce_sales(Some(10.9)), SalesCoercion::Parsed(10));
        assert_eq!(coerce_sales(Some(-3.0)), SalesCoercion::Clamped);
        assert_eq!(coerce_sales(Some(f64::NAN)), SalesCoercion::Defaulted);
        assert_eq!(coerce_sales(Some(f64::INFINITY)), SalesCoercion::Defaulted);
        assert_eq!(coerce_sales(None), SalesCoercion::Defaulted);
    }

    #[test]
    fn test_coerce_advertising() {
        assert!(coerce_advertising(Some(1.0)));
        assert!(!coerce_advertising(Some(5.0)));
        assert!(!coerce_advertising(Some(1.5)));
        assert!(!coerce_advertising(Some(-1.0)));
        assert!(!coerce_advertising(None));
    }

    #[test]
    fn test_coerce_year() {
        assert_eq!(coerce_year(Some(2023.0)), Some(2023));
        assert_eq!(coerce_year(Some(2023.5)), None);
        assert_eq!(coerce_year(Some(1e12)), None);
        assert_eq!(coerce_year(None), None);
    }
}
