use super::{ForecastPoint, ModelKind};
use crate::aggregation::AggregatedPoint;
use crate::error::Result;
use sales_forecast::models::holt_linear::HoltLinear;
use sales_forecast::models::seasonal_trend::SeasonalTrend;
use sales_forecast::models::{ForecastModel, TrainedForecastModel};
use sales_forecast::{MonthlySeries, Observation};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared handle to a trained model
pub type FittedModel = Arc<dyn TrainedForecastModel>;

/// Fits forecast models on aggregated series, memoized by series content
pub struct ForecastAdapter {
    kind: ModelKind,
    // Held for the whole fit so a given series is trained at most once
    cache: Mutex<HashMap<Vec<AggregatedPoint>, FittedModel>>,
    fits: AtomicUsize,
}

impl std::fmt::Debug for ForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAdapter")
            .field("kind", &self.kind)
            .field("fits", &self.fit_count())
            .finish_non_exhaustive()
    }
}

fn to_model_series(series: &[AggregatedPoint]) -> Result<MonthlySeries> {
    let observations = series
        .iter()
        .map(|p| Observation::new(p.data, p.vendas_total as f64))
        .collect();
    Ok(MonthlySeries::new(observations)?)
}

impl ForecastAdapter {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            cache: Mutex::new(HashMap::new()),
            fits: AtomicUsize::new(0),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Number of models actually trained (cache hits excluded)
    pub fn fit_count(&self) -> usize {
        self.fits.load(Ordering::SeqCst)
    }

    /// Train a model on `series`, reusing a previous fit of identical content.
    ///
    /// Failed fits are not cached.
    pub fn fit(&self, series: &[AggregatedPoint]) -> Result<FittedModel> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cache.get(series) {
            log::debug!("Reusing fitted {} for {} points", model.name(), series.len());
            return Ok(Arc::clone(model));
        }

        let data = to_model_series(series)?;
        let model: FittedModel = match self.kind {
            ModelKind::SeasonalTrend => Arc::new(SeasonalTrend::new().train(&data)?) as FittedModel,
            ModelKind::HoltLinear { alpha, beta } => {
                Arc::new(HoltLinear::new(alpha, beta)?.train(&data)?) as FittedModel
            }
        };
        self.fits.fetch_add(1, Ordering::SeqCst);
        log::info!("Fitted {} on {} monthly points", model.name(), series.len());

        cache.insert(series.to_vec(), Arc::clone(&model));
        Ok(model)
    }

    /// Project `horizon` months past the model's last observation
    pub fn predict(
        &self,
        model: &dyn TrainedForecastModel,
        horizon: usize,
    ) -> Result<Vec<ForecastPoint>> {
        let result = model.forecast(horizon)?;
        Ok(result
            .iter()
            .map(|(ds, yhat)| ForecastPoint { ds, yhat })
            .collect())
    }
}
