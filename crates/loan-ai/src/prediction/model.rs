//! Pretrained classifier artifacts.
//!
//! The two models are loaded once at startup, validated against their
//! feature schemas, and shared read-only for the process lifetime. The
//! [`Classifier`] trait keeps the orchestration service testable without
//! real artifacts on disk.

use std::path::Path;
use std::sync::Arc;

use tract_onnx::prelude::*;

use super::domain::ModelKind;
use super::features::schema_for;
use crate::config::ModelConfig;

/// Probability mass assigned to each class by a binary classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    pub deny: f64,
    pub approve: f64,
}

impl ClassProbabilities {
    /// Predicted label: the class holding the larger probability mass.
    pub fn approved(&self) -> bool {
        self.approve >= self.deny
    }

    /// Probability mass of the predicted class.
    pub fn confidence(&self) -> f64 {
        if self.approved() {
            self.approve
        } else {
            self.deny
        }
    }
}

/// Read-only binary classifier over a fixed-width feature row.
pub trait Classifier: Send + Sync {
    fn feature_count(&self) -> usize;
    fn predict(&self, features: &[f32]) -> Result<ClassProbabilities, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("{kind} model expects {expected} features, artifact declares {found}")]
    SchemaMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("feature row has {found} columns, model expects {expected}")]
    RowWidth { expected: usize, found: usize },
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("model produced no usable probability output")]
    EmptyOutput,
}

type RunnableOnnx = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-backed classifier. The input shape is pinned to `(1, feature_count)`
/// at load time, so a serialized artifact whose schema drifted from the
/// feature ordering fails startup instead of silently misreading columns.
pub struct OnnxClassifier {
    model: RunnableOnnx,
    feature_count: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, feature_count: usize) -> Result<Self, ModelError> {
        let load_error = |err: TractError| ModelError::Load {
            path: path.display().to_string(),
            reason: err.to_string(),
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_error)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, feature_count)),
            )
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        Ok(Self {
            model,
            feature_count,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn predict(&self, features: &[f32]) -> Result<ClassProbabilities, ModelError> {
        if features.len() != self.feature_count {
            return Err(ModelError::RowWidth {
                expected: self.feature_count,
                found: features.len(),
            });
        }

        let input = Tensor::from_shape(&[1, self.feature_count], features)
            .map_err(|err| ModelError::Inference(err.to_string()))?;
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|err| ModelError::Inference(err.to_string()))?;

        // Exported classifiers differ in output layout: some emit a label
        // tensor before the probabilities. The first float output wins.
        for output in outputs.iter() {
            if let Ok(view) = output.to_array_view::<f32>() {
                let values: Vec<f32> = view.iter().copied().collect();
                return probabilities_from_output(&values);
            }
        }

        Err(ModelError::EmptyOutput)
    }
}

/// Interpret a raw float output as class probabilities: a single value is a
/// logit for the positive class; two or more values are per-class masses.
fn probabilities_from_output(values: &[f32]) -> Result<ClassProbabilities, ModelError> {
    match values {
        [] => Err(ModelError::EmptyOutput),
        [logit] => {
            let approve = sigmoid(f64::from(*logit));
            Ok(ClassProbabilities {
                deny: 1.0 - approve,
                approve,
            })
        }
        [deny, approve, ..] => Ok(ClassProbabilities {
            deny: f64::from(*deny),
            approve: f64::from(*approve),
        }),
    }
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

/// The two pretrained classifiers, keyed by model variant.
#[derive(Clone)]
pub struct ModelStore {
    basic: Arc<dyn Classifier>,
    enriched: Arc<dyn Classifier>,
}

impl ModelStore {
    /// Wrap two classifiers, verifying each declares the feature width its
    /// schema prescribes.
    pub fn new(
        basic: Arc<dyn Classifier>,
        enriched: Arc<dyn Classifier>,
    ) -> Result<Self, ModelError> {
        for (kind, classifier) in [
            (ModelKind::Basic, &basic),
            (ModelKind::Macro, &enriched),
        ] {
            let expected = schema_for(kind).len();
            let found = classifier.feature_count();
            if found != expected {
                return Err(ModelError::SchemaMismatch {
                    kind: kind.label(),
                    expected,
                    found,
                });
            }
        }

        Ok(Self { basic, enriched })
    }

    /// Load both ONNX artifacts from their configured paths.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let basic = OnnxClassifier::load(
            &config.basic_path,
            schema_for(ModelKind::Basic).len(),
        )?;
        let enriched = OnnxClassifier::load(
            &config.macro_path,
            schema_for(ModelKind::Macro).len(),
        )?;

        Self::new(Arc::new(basic), Arc::new(enriched))
    }

    pub fn classifier(&self, kind: ModelKind) -> &dyn Classifier {
        match kind {
            ModelKind::Basic => self.basic.as_ref(),
            ModelKind::Macro => self.enriched.as_ref(),
        }
    }
}
