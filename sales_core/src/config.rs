use crate::error::{Result, SalesError};
use crate::forecast::{ModelKind, MAX_HORIZON_MONTHS};
use crate::month::Month;
use crate::persistence::DEFAULT_PREFIX;
use std::env;
use std::path::PathBuf;

/// Where raw records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// SQLite database file and table name
    Sqlite { path: PathBuf, table: String },
    /// Raw CSV export with a header row
    Csv { path: PathBuf },
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub snapshot_prefix: String,
    pub source: SourceSpec,
    pub forecast_horizon: usize,
    pub forecast_model: ModelKind,
    pub report_year: Option<i32>,
    pub report_month: Option<Month>,
    pub rust_log: String,
}

pub const DEFAULT_DATA_DIR: &str = "Data";
pub const DEFAULT_SOURCE: &str = "sqlite:vendas.db";
pub const DEFAULT_SOURCE_TABLE: &str = "VendasMacarrao";
pub const DEFAULT_HORIZON: usize = 6;

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = get("SALES_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let snapshot_prefix = get("SALES_SNAPSHOT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        let table = get("SALES_SOURCE_TABLE").unwrap_or_else(|| DEFAULT_SOURCE_TABLE.to_string());
        let source = parse_source(
            &get("SALES_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            table,
        )?;

        let forecast_horizon = match get("FORECAST_HORIZON") {
            Some(raw) => parse_horizon(&raw)?,
            None => DEFAULT_HORIZON,
        };

        let forecast_model = match get("FORECAST_MODEL") {
            Some(raw) => raw.parse()?,
            None => ModelKind::default(),
        };

        let report_year = get("REPORT_YEAR")
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|e| SalesError::Config(format!("REPORT_YEAR '{}': {}", raw, e)))
            })
            .transpose()?;

        let report_month = get("REPORT_MONTH").map(|raw| parse_month(&raw)).transpose()?;

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            data_dir,
            snapshot_prefix,
            source,
            forecast_horizon,
            forecast_model,
            report_year,
            report_month,
            rust_log,
        })
    }
}

fn parse_source(raw: &str, table: String) -> Result<SourceSpec> {
    match raw.split_once(':') {
        Some(("sqlite", path)) if !path.is_empty() => Ok(SourceSpec::Sqlite {
            path: PathBuf::from(path),
            table,
        }),
        Some(("csv", path)) if !path.is_empty() => Ok(SourceSpec::Csv {
            path: PathBuf::from(path),
        }),
        _ => Err(SalesError::Config(format!(
            "SALES_SOURCE must be 'sqlite:<path>' or 'csv:<path>', got '{}'",
            raw
        ))),
    }
}

fn parse_horizon(raw: &str) -> Result<usize> {
    let horizon: usize = raw
        .parse()
        .map_err(|e| SalesError::Config(format!("FORECAST_HORIZON '{}': {}", raw, e)))?;
    if !(1..=MAX_HORIZON_MONTHS).contains(&horizon) {
        return Err(SalesError::Config(format!(
            "FORECAST_HORIZON must be between 1 and {}, got {}",
            MAX_HORIZON_MONTHS, horizon
        )));
    }
    Ok(horizon)
}

/// Accepts a month name (repaired like raw data) or a number 1-12
fn parse_month(raw: &str) -> Result<Month> {
    raw.parse::<u32>()
        .ok()
        .and_then(Month::from_index)
        .or_else(|| Month::repair(raw))
        .ok_or_else(|| SalesError::Config(format!("REPORT_MONTH '{}' is not a month", raw)))
}
