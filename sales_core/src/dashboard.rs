//! Read contract for the reporting layer
//!
//! Every accessor reads the latest snapshot and says explicitly when there is
//! nothing to show.

use crate::aggregation::{monthly_series, AggregatedPoint};
use crate::error::Result;
use crate::forecast::{ForecastCapability, ForecastOutcome};
use crate::persistence::SnapshotStore;
use crate::records::CanonicalTable;

pub struct SalesDashboard {
    store: SnapshotStore,
    forecast: ForecastCapability,
}

impl SalesDashboard {
    pub fn new(store: SnapshotStore, forecast: ForecastCapability) -> Self {
        Self { store, forecast }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn forecast_capability(&self) -> &ForecastCapability {
        &self.forecast
    }

    /// The canonical table of the latest snapshot, `None` when none exists
    pub fn canonical_table(&self) -> Result<Option<CanonicalTable>> {
        Ok(self.store.load_latest()?.map(|snapshot| snapshot.table))
    }

    /// Monthly sales totals of the latest snapshot
    pub fn aggregated_series(&self) -> Result<Option<Vec<AggregatedPoint>>> {
        Ok(self.canonical_table()?.map(|table| monthly_series(&table)))
    }

    /// Forecast `horizon` months past the latest observed month.
    ///
    /// [`ForecastOutcome::Unavailable`] is returned without touching storage
    /// when forecasting is not part of this build.
    pub fn forecast(&self, horizon: usize) -> Result<ForecastOutcome> {
        if !self.forecast.is_available() {
            return Ok(ForecastOutcome::Unavailable);
        }

        match self.aggregated_series()? {
            Some(series) => self.forecast_series(&series, horizon),
            None => Ok(ForecastOutcome::NoData),
        }
    }

    /// Forecast from a series the caller already derived, without reading
    /// storage again
    pub fn forecast_series(
        &self,
        series: &[AggregatedPoint],
        horizon: usize,
    ) -> Result<ForecastOutcome> {
        self.forecast.forecast(series, horizon)
    }
}
