use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::LoanApplication;
use super::indicators::IndicatorProvider;
use super::service::{PredictionError, PredictionService};

/// Router builder exposing the prediction endpoint.
pub fn prediction_router<P>(service: Arc<PredictionService<P>>) -> Router
where
    P: IndicatorProvider + 'static,
{
    Router::new()
        .route("/predict", post(predict_handler::<P>))
        .with_state(service)
}

pub(crate) async fn predict_handler<P>(
    State(service): State<Arc<PredictionService<P>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    match service.predict(&application).await {
        Ok(prediction) => (StatusCode::OK, axum::Json(prediction)).into_response(),
        Err(PredictionError::Validation(err)) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PredictionError::Model(err)) => {
            // Schema or inference failures are programming defects, not
            // transient conditions; surface them as server errors.
            error!(error = %err, "model invocation failed");
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
