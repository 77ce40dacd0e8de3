//! Snapshot persistence with age-based retention
//!
//! Every normalization run writes one immutable CSV snapshot named
//! `<prefix><YYYYMMDD_HHMMSS>.csv`. Snapshots are never rewritten; readers
//! always take the most recently modified one, and [`SnapshotStore::prune`]
//! deletes the ones older than [`RETENTION`].

use crate::data::{COL_ANO, COL_DATA, COL_MES, COL_PUBLICIDADE, COL_VENDAS};
use crate::error::{Result, SalesError};
use crate::records::{CanonicalRecord, CanonicalTable};
use crate::reporter::{PipelineEvent, PipelineReporter};
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Snapshots older than this are removed by [`SnapshotStore::prune`]
pub const RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// File name prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "vendas_macarrao_tratadas_";

/// Column order of every snapshot file
pub const SNAPSHOT_HEADER: [&str; 5] = [COL_MES, COL_ANO, COL_VENDAS, COL_PUBLICIDADE, COL_DATA];

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SNAPSHOT_EXTENSION: &str = ".csv";
const MAX_SAME_SECOND_SNAPSHOTS: u32 = 99;

/// A snapshot file found in the storage directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl SnapshotEntry {
    fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

/// The table read back from a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub path: PathBuf,
    pub table: CanonicalTable,
}

/// Timestamped snapshot storage in a single directory
#[derive(Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    prefix: String,
    reporter: Arc<dyn PipelineReporter>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("root", &self.root)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>, reporter: Arc<dyn PipelineReporter>) -> Self {
        Self {
            root: root.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            reporter,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Write a snapshot stamped with the current local time.
    ///
    /// Failures are reported and swallowed: `None` means no snapshot was
    /// written and the normalization can simply be re-run.
    pub fn save(&self, table: &CanonicalTable) -> Option<PathBuf> {
        self.save_at(table, Local::now().naive_local())
    }

    /// Same as [`save`](Self::save) with an explicit timestamp
    pub fn save_at(&self, table: &CanonicalTable, at: NaiveDateTime) -> Option<PathBuf> {
        match self.try_save_at(table, at) {
            Ok(path) => {
                self.reporter.report(PipelineEvent::SnapshotSaved {
                    path: path.clone(),
                    rows: table.len(),
                });
                Some(path)
            }
            Err(err) => {
                self.reporter.report(PipelineEvent::SnapshotSaveFailed {
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    /// Write a snapshot, propagating failures.
    ///
    /// The file is written under a temporary name and renamed into place, so
    /// a concurrent reader sees either the whole snapshot or none of it.
    pub fn try_save_at(&self, table: &CanonicalTable, at: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;

        let path = self.unique_path(at)?;
        let partial = path.with_extension("partial");

        if let Err(err) = write_table(&partial, table) {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
        fs::rename(&partial, &path)?;

        Ok(path)
    }

    fn unique_path(&self, at: NaiveDateTime) -> Result<PathBuf> {
        let stem = format!("{}{}", self.prefix, at.format(TIMESTAMP_FORMAT));

        let candidate = self.root.join(format!("{}{}", stem, SNAPSHOT_EXTENSION));
        if !candidate.exists() {
            return Ok(candidate);
        }

        // Fixed-width counter keeps same-second names in lexicographic order
        for n in 1..=MAX_SAME_SECOND_SNAPSHOTS {
            let candidate = self
                .root
                .join(format!("{}_{:02}{}", stem, n, SNAPSHOT_EXTENSION));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(SalesError::Persistence(format!(
            "no free snapshot name for {}",
            stem
        )))
    }

    fn is_snapshot_name(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name.ends_with(SNAPSHOT_EXTENSION)
    }

    /// Snapshots in the storage directory, oldest first.
    ///
    /// Ordered by modification time, ties broken by file name. A missing
    /// directory holds no snapshots.
    pub fn list(&self) -> Result<Vec<SnapshotEntry>> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !self.is_snapshot_name(name) {
                continue;
            }

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            entries.push(SnapshotEntry {
                path: entry.path(),
                modified: metadata.modified()?,
            });
        }

        entries.sort_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.file_name().cmp(b.file_name()))
        });
        Ok(entries)
    }

    /// The most recent snapshot, or `None` when there is none
    pub fn latest(&self) -> Result<Option<SnapshotEntry>> {
        Ok(self.list()?.pop())
    }

    /// Read the most recent snapshot; `Ok(None)` signals that no data exists
    pub fn load_latest(&self) -> Result<Option<LoadedSnapshot>> {
        match self.latest()? {
            Some(entry) => {
                let table = read_table(&entry.path)?;
                Ok(Some(LoadedSnapshot {
                    path: entry.path,
                    table,
                }))
            }
            None => Ok(None),
        }
    }

    /// Remove snapshots older than [`RETENTION`]; returns the removed paths
    pub fn prune(&self) -> Vec<PathBuf> {
        self.prune_at(SystemTime::now())
    }

    /// Best-effort retention pass relative to `now`.
    ///
    /// Each removal is reported. Scan or removal failures are reported and
    /// skipped; they never abort the pass.
    pub fn prune_at(&self, now: SystemTime) -> Vec<PathBuf> {
        let entries = match self.list() {
            Ok(entries) => entries,
            Err(err) => {
                self.reporter.report(PipelineEvent::PruneFailed {
                    reason: err.to_string(),
                });
                return Vec::new();
            }
        };

        let mut removed = Vec::new();
        for entry in entries {
            // Modification times in the future count as fresh
            let age = now.duration_since(entry.modified).unwrap_or_default();
            if age <= RETENTION {
                continue;
            }

            match fs::remove_file(&entry.path) {
                Ok(()) => {
                    self.reporter.report(PipelineEvent::SnapshotRemoved {
                        path: entry.path.clone(),
                    });
                    removed.push(entry.path);
                }
                Err(err) => self.reporter.report(PipelineEvent::PruneFailed {
                    reason: format!("{}: {}", entry.path.display(), err),
                }),
            }
        }

        removed
    }
}

/// Write records as CSV with the snapshot header
pub fn write_records<'a, W, I>(writer: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalRecord>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(SNAPSHOT_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table(path: &Path, table: &CanonicalTable) -> Result<()> {
    let file = fs::File::create(path)?;
    write_records(file, table)?;
    Ok(())
}

/// Parse a snapshot file back into a table
pub fn read_table(path: &Path) -> Result<CanonicalTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let records = rdr
        .deserialize::<CanonicalRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CanonicalTable::new(records))
}
