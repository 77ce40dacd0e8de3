//! Raw sales batches as delivered by the source

use crate::error::{Result, SalesError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Required raw column: month name
pub const COL_MES: &str = "Mes";
/// Required raw column: year
pub const COL_ANO: &str = "Ano";
/// Required raw column: sales quantity
pub const COL_VENDAS: &str = "Vendas";
/// Optional raw column: advertising flag
pub const COL_PUBLICIDADE: &str = "Publicidade";
/// Synthesized snapshot column: first day of the month
pub const COL_DATA: &str = "Data";

/// Columns that must be present for a batch to be normalized
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_MES, COL_ANO, COL_VENDAS];

/// An arbitrary-width batch of raw sales rows
///
/// Values are untyped from the pipeline's point of view: any column may hold
/// text, integers, floats or nulls.
#[derive(Debug, Clone)]
pub struct RawBatch {
    df: DataFrame,
}

/// Data loader for raw sales exports
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a raw batch from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<RawBatch> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(RawBatch::from_dataframe(df))
    }
}

impl RawBatch {
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a batch from named columns of optional text cells
    pub fn from_text_columns(columns: Vec<(String, Vec<Option<String>>)>) -> Result<Self> {
        let series = columns
            .into_iter()
            .map(|(name, values)| Series::new(&name, values))
            .collect::<Vec<_>>();
        Ok(Self::from_dataframe(DataFrame::new(series)?))
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.df.get_column_names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_names().contains(&name)
    }

    /// First required column missing from the batch, if any
    pub fn missing_required_column(&self) -> Option<&'static str> {
        REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|name| !self.has_column(name))
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column cells rendered as text; nulls stay `None`
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self.column(name)?.cast(&DataType::Utf8)?;
        let values = series
            .utf8()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Column cells coerced to `f64`; nulls and unparseable cells are `None`.
    /// Text cells are trimmed before parsing.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name)?;
        let series = match column.dtype() {
            DataType::Utf8 => {
                let trimmed: Utf8Chunked = column
                    .utf8()?
                    .into_iter()
                    .map(|v| v.map(str::trim))
                    .collect();
                trimmed.into_series().cast(&DataType::Float64)?
            }
            _ => column.cast(&DataType::Float64)?,
        };
        Ok(series.f64()?.into_iter().collect())
    }

    fn column(&self, name: &str) -> Result<&Series> {
        self.df
            .column(name)
            .map_err(|_| SalesError::Schema(name.to_string()))
    }
}
