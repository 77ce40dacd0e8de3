//! Raw record sources
//!
//! A source only has to hand over a [`RawBatch`]; connection handling stays
//! behind the [`RawSource`] trait.

use crate::config::SourceSpec;
use crate::data::{DataLoader, RawBatch};
use crate::error::{Result, SalesError};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Anything that can produce a batch of raw sales rows
pub trait RawSource {
    fn fetch(&self) -> Result<RawBatch>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Raw CSV export with a header row
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RawSource for CsvSource {
    fn fetch(&self) -> Result<RawBatch> {
        DataLoader::from_csv(&self.path)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Every row of one table in a SQLite database, opened read-only
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
    table: String,
}

impl SqliteSource {
    /// The table name is interpolated into SQL, so it must be a plain identifier
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        let valid = !table.is_empty()
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !table.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(SalesError::Config(format!(
                "'{}' is not a valid table name",
                table
            )));
        }

        Ok(Self {
            path: path.into(),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn cell_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

impl RawSource for SqliteSource {
    /// `SELECT *` over the table; every cell is carried as text and typed later
    fn fetch(&self) -> Result<RawBatch> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM \"{}\"", self.table))?;

        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(cell_to_text(row.get_ref(i)?));
            }
        }

        log::info!(
            "Read {} row(s) from table {}",
            columns.first().map_or(0, Vec::len),
            self.table
        );

        RawBatch::from_text_columns(names.into_iter().zip(columns).collect())
    }

    fn describe(&self) -> String {
        format!("sqlite:{} ({})", self.path.display(), self.table)
    }
}

/// Build the configured source
pub fn from_spec(spec: &SourceSpec) -> Result<Box<dyn RawSource>> {
    match spec {
        SourceSpec::Sqlite { path, table } => Ok(Box::new(SqliteSource::new(path.clone(), table.clone())?)),
        SourceSpec::Csv { path } => Ok(Box::new(CsvSource::new(path.clone()))),
    }
}
