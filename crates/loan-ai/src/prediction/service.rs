use std::sync::Arc;

use tracing::debug;

use super::domain::{LoanApplication, ModelKind, Prediction, ValidationError};
use super::features::{select_model, EncodedApplication};
use super::indicators::IndicatorProvider;
use super::model::{ModelError, ModelStore};

/// Orchestrates the request-to-prediction pipeline: validate, encode,
/// select a model path, enrich with indicators when the macro path is
/// chosen, and invoke the classifier.
pub struct PredictionService<P> {
    store: ModelStore,
    indicators: Arc<P>,
}

impl<P> PredictionService<P>
where
    P: IndicatorProvider + 'static,
{
    pub fn new(store: ModelStore, indicators: Arc<P>) -> Self {
        Self { store, indicators }
    }

    /// Score one application. Indicators are fetched only on the macro path
    /// and the provider is fail-open, so the only failure modes are request
    /// validation and model invocation.
    pub async fn predict(
        &self,
        application: &LoanApplication,
    ) -> Result<Prediction, PredictionError> {
        application.validate()?;

        let encoded = EncodedApplication::encode(application);
        let kind = select_model(application);

        let row = match kind {
            ModelKind::Basic => encoded.basic_row(),
            ModelKind::Macro => {
                let indicators = self.indicators.fetch_indicators().await;
                encoded.macro_row(&indicators)
            }
        };

        let probabilities = self.store.classifier(kind).predict(&row)?;
        let prediction = Prediction {
            loan_approved: probabilities.approved(),
            confidence: round3(probabilities.confidence().clamp(0.0, 1.0)),
            model_used: kind.label(),
        };

        debug!(
            model = prediction.model_used,
            approved = prediction.loan_approved,
            confidence = prediction.confidence,
            "scored application"
        );

        Ok(prediction)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_rounds_to_three_decimals() {
        assert_eq!(round3(0.87654), 0.877);
        assert_eq!(round3(0.0004), 0.0);
        assert_eq!(round3(1.0), 1.0);
    }
}
