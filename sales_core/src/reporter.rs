//! Pipeline observability
//!
//! The normalizer and the snapshot store never log directly; they hand
//! [`PipelineEvent`]s to a [`PipelineReporter`] supplied by the caller.
//! [`LogReporter`] forwards to the `log` facade, [`MemoryReporter`] keeps the
//! events for inspection.

use log::Level;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Something worth recording while refreshing or pruning the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Rows whose month could not be repaired and were set to the fallback
    InvalidMonths { count: usize, fallback: &'static str },
    /// Rows whose sales value was missing or not numeric and became 0
    SalesCoerced { count: usize },
    /// Rows whose sales value was negative and was clamped to 0
    SalesClamped { count: usize },
    /// Rows whose date could not be synthesized
    DateSynthesisFailed { count: usize },
    /// Rows in a successfully normalized batch
    RowsProcessed { count: usize },
    /// Unexpected failure while normalizing; no table was produced
    NormalizationFailed { reason: String },
    SnapshotSaved { path: PathBuf, rows: usize },
    SnapshotSaveFailed { reason: String },
    SnapshotRemoved { path: PathBuf },
    PruneFailed { reason: String },
}

impl PipelineEvent {
    /// Severity used when forwarding the event to a logger
    pub fn level(&self) -> Level {
        match self {
            PipelineEvent::RowsProcessed { .. }
            | PipelineEvent::SnapshotSaved { .. }
            | PipelineEvent::SnapshotRemoved { .. } => Level::Info,
            PipelineEvent::InvalidMonths { .. }
            | PipelineEvent::SalesCoerced { .. }
            | PipelineEvent::SalesClamped { .. }
            | PipelineEvent::DateSynthesisFailed { .. } => Level::Warn,
            PipelineEvent::NormalizationFailed { .. }
            | PipelineEvent::SnapshotSaveFailed { .. }
            | PipelineEvent::PruneFailed { .. } => Level::Error,
        }
    }

    /// Whether this event flags a recoverable data-quality anomaly
    pub fn is_data_quality_warning(&self) -> bool {
        self.level() == Level::Warn
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::InvalidMonths { count, fallback } => write!(
                f,
                "{} row(s) with an invalid 'Mes' value, defaulted to {}",
                count, fallback
            ),
            PipelineEvent::SalesCoerced { count } => {
                write!(f, "{} row(s) with missing or non-numeric 'Vendas', set to 0", count)
            }
            PipelineEvent::SalesClamped { count } => {
                write!(f, "{} row(s) with negative 'Vendas', clamped to 0", count)
            }
            PipelineEvent::DateSynthesisFailed { count } => {
                write!(f, "{} row(s) whose 'Data' could not be built from 'Ano'/'Mes'", count)
            }
            PipelineEvent::RowsProcessed { count } => write!(f, "📊 Rows processed: {}", count),
            PipelineEvent::NormalizationFailed { reason } => {
                write!(f, "Normalization failed: {}", reason)
            }
            PipelineEvent::SnapshotSaved { path, rows } => {
                write!(f, "📁 Saved {} row(s) to {}", rows, path.display())
            }
            PipelineEvent::SnapshotSaveFailed { reason } => {
                write!(f, "Failed to save snapshot: {}", reason)
            }
            PipelineEvent::SnapshotRemoved { path } => {
                write!(f, "🗑️ Removed stale snapshot {}", path.display())
            }
            PipelineEvent::PruneFailed { reason } => {
                write!(f, "Failed to prune snapshots: {}", reason)
            }
        }
    }
}

/// Receiver of pipeline events
pub trait PipelineReporter: Send + Sync {
    fn report(&self, event: PipelineEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl PipelineReporter for LogReporter {
    fn report(&self, event: PipelineEvent) {
        log::log!(target: "sales_core", event.level(), "{}", event);
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<PipelineEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn warnings(&self) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(PipelineEvent::is_data_quality_warning)
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl PipelineReporter for MemoryReporter {
    fn report(&self, event: PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
