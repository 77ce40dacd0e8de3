//! Refresh job: read the raw source, normalize, write a snapshot, prune old ones.

use sales_core::pipeline::RefreshJob;
use sales_core::{source, Config, LogReporter, Normalizer, SnapshotStore};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };
    sales_core::init_logging(&config.rust_log);

    log::info!("Starting sales refresh...");

    let reporter = Arc::new(LogReporter);
    let source = match source::from_spec(&config.source) {
        Ok(source) => source,
        Err(err) => {
            log::error!("Cannot build source: {}", err);
            return ExitCode::from(2);
        }
    };
    let normalizer = Normalizer::new(reporter.clone());
    let store = SnapshotStore::new(&config.data_dir, reporter).with_prefix(&config.snapshot_prefix);

    match RefreshJob::new(source.as_ref(), &normalizer, &store).run() {
        Ok(outcome) => {
            log::info!(
                "Refresh finished: {} row(s) normalized, {} stale snapshot(s) removed",
                outcome.rows_normalized,
                outcome.pruned.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("❌ Refresh aborted: {}", err);
            ExitCode::FAILURE
        }
    }
}
