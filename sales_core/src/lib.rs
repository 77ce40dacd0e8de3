//! # Sales Core
//!
//! Canonicalization and reporting pipeline for monthly sales records.
//!
//! ## Features
//!
//! - Raw batch ingestion from SQLite tables or CSV exports
//! - Month repair, numeric coercion and date synthesis with logged fallbacks
//! - Timestamped CSV snapshots with a fixed seven-day retention
//! - Monthly aggregation, advertising splits and period summaries
//! - Optional forecasting behind the `forecast` cargo feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_core::data::DataLoader;
//! use sales_core::normalizer::Normalizer;
//! use sales_core::persistence::SnapshotStore;
//! use sales_core::reporter::LogReporter;
//! use std::sync::Arc;
//!
//! let reporter = Arc::new(LogReporter);
//! let batch = DataLoader::from_csv("raw_sales.csv")?;
//! let table = Normalizer::new(reporter.clone()).normalize(&batch)?;
//!
//! let store = SnapshotStore::new("Data", reporter);
//! store.save(&table);
//! store.prune();
//! # Ok::<(), sales_core::SalesError>(())
//! ```

pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod forecast;
pub mod month;
pub mod normalizer;
pub mod persistence;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod reporter;
pub mod source;

// Re-export commonly used types
pub use crate::aggregation::{AdvertisingGroup, AggregatedPoint};
pub use crate::config::Config;
pub use crate::dashboard::SalesDashboard;
pub use crate::data::{DataLoader, RawBatch};
pub use crate::error::SalesError;
pub use crate::forecast::{ForecastCapability, ForecastOutcome, ForecastPoint, ModelKind};
pub use crate::month::Month;
pub use crate::normalizer::Normalizer;
pub use crate::persistence::SnapshotStore;
pub use crate::records::{CanonicalRecord, CanonicalTable};
pub use crate::reporter::{LogReporter, MemoryReporter, PipelineEvent, PipelineReporter};

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialise `env_logger` on stderr, honouring `RUST_LOG` over `default_filter`
pub fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}
