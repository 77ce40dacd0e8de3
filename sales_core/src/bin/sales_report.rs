//! Text report over the latest snapshot: period summary, advertising split,
//! monthly series and forecast.

use sales_core::aggregation::{advertising_by_year, available_years, monthly_series};
use sales_core::report::{advertising_insight, summarize, Period};
use sales_core::{Config, ForecastCapability, ForecastOutcome, LogReporter, SalesDashboard, SnapshotStore};
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

    let store = SnapshotStore::new(&config.data_dir, Arc::new(LogReporter))
        .with_prefix(&config.snapshot_prefix);
    let dashboard = SalesDashboard::new(store, ForecastCapability::detect(config.forecast_model));

    match run(&dashboard, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Report failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(dashboard: &SalesDashboard, config: &Config) -> sales_core::error::Result<()> {
    let Some(table) = dashboard.canonical_table()? else {
        println!("❌ No snapshot found in {}", dashboard.store().root().display());
        return Ok(());
    };

    let Some(default_period) = Period::default_for(&table) else {
        println!("⚠️ The latest snapshot has no rows with a valid year.");
        return Ok(());
    };
    let period = Period::new(
        config.report_year.unwrap_or(default_period.year),
        config.report_month.unwrap_or(default_period.month),
    );

    println!("📈 Sales report: {}", period);
    println!("   Years available: {:?}", available_years(&table));

    match summarize(&table, period) {
        Some(summary) => {
            println!("   Total sales:  {}", summary.total);
            println!("   Mean sales:   {:.2}", summary.mean);
            match summary.yoy_change_pct {
                Some(pct) => println!("   YoY change:   {:.1}%", pct),
                None => println!("   YoY change:   -"),
            }
            println!("   Insight: {}", advertising_insight(&table, period));
        }
        None => println!("⚠️ No data for the selected period."),
    }

    println!();
    println!("🔹 {} by year (advertising vs not)", period.month);
    for group in advertising_by_year(&table, period.month) {
        println!(
            "   {}  publicidade={}  vendas={}",
            group.ano, group.publicidade, group.vendas_total
        );
    }

    println!();
    println!("🔹 Monthly sales");
    let series = monthly_series(&table);
    for point in &series {
        println!("   {}  {}", point.data, point.vendas_total);
    }

    println!();
    match dashboard.forecast_series(&series, config.forecast_horizon) {
        Ok(ForecastOutcome::Projected(points)) => {
            println!("🔹 Forecast ({} months)", config.forecast_horizon);
            for point in points {
                println!("   {}  {:.1}", point.ds, point.yhat);
            }
        }
        Ok(ForecastOutcome::Unavailable) => {
            println!("📦 Forecasting is not available in this build.")
        }
        Ok(ForecastOutcome::NoData) => println!("⚠️ No dated sales to forecast from."),
        Err(err) => println!("⚠️ Forecast failed: {}", err),
    }

    Ok(())
}
