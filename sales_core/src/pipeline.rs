//! The refresh job: fetch, normalize, snapshot, prune

use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::persistence::SnapshotStore;
use crate::source::RawSource;
use std::path::PathBuf;

/// What one refresh run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub rows_read: usize,
    pub rows_normalized: usize,
    /// `None` when the snapshot could not be written
    pub snapshot: Option<PathBuf>,
    pub pruned: Vec<PathBuf>,
}

/// One data refresh, run once per external trigger
pub struct RefreshJob<'a> {
    source: &'a dyn RawSource,
    normalizer: &'a Normalizer,
    store: &'a SnapshotStore,
}

impl<'a> RefreshJob<'a> {
    pub fn new(source: &'a dyn RawSource, normalizer: &'a Normalizer, store: &'a SnapshotStore) -> Self {
        Self {
            source,
            normalizer,
            store,
        }
    }

    /// Run the job.
    ///
    /// Fetch and normalization failures abort before anything is written.
    /// Snapshot and retention failures are reported by the store and never
    /// abort a run whose normalization succeeded.
    pub fn run(&self) -> Result<RefreshOutcome> {
        log::info!("Starting refresh from {}", self.source.describe());

        let batch = self.source.fetch()?;
        log::info!("Source read, {} row(s)", batch.len());

        let table = self.normalizer.normalize(&batch)?;
        let snapshot = self.store.save(&table);
        let pruned = self.store.prune();

        Ok(RefreshOutcome {
            rows_read: batch.len(),
            rows_normalized: table.len(),
            snapshot,
            pruned,
        })
    }
}
