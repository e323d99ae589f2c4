use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use loan_ai::config::AppConfig;
use loan_ai::error::AppError;
use loan_ai::prediction::{FredClient, ModelStore, PredictionService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the live collaborators: ONNX artifacts from disk and the FRED
/// indicator client. Artifact loading validates each model's input width
/// against its feature schema, so a drifted artifact fails startup here.
pub(crate) fn build_prediction_service(
    config: &AppConfig,
) -> Result<PredictionService<FredClient>, AppError> {
    let store = ModelStore::load(&config.models)?;
    let provider = FredClient::new(&config.macro_data)?;
    Ok(PredictionService::new(store, Arc::new(provider)))
}
