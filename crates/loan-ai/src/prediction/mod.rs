//! Request-to-prediction pipeline.
//!
//! Feature encoding and model selection are pure and live in [`features`];
//! the external collaborators (macro indicator source, pretrained
//! classifiers) sit behind the [`indicators::IndicatorProvider`] and
//! [`model::Classifier`] traits so the orchestration in [`service`] can be
//! exercised without network access or model artifacts.

pub mod domain;
pub mod features;
pub mod fred;
pub mod indicators;
pub mod model;
pub mod router;
pub mod service;

pub use domain::{
    EmploymentType, LoanApplication, LoanPurpose, LoanType, ModelKind, Prediction,
    ValidationError,
};
pub use features::{select_model, EncodedApplication, BASIC_COLUMNS, MACRO_COLUMNS};
pub use fred::{FredClient, FredError};
pub use indicators::{IndicatorProvider, MacroIndicators, StaticIndicatorProvider};
pub use model::{ClassProbabilities, Classifier, ModelError, ModelStore, OnnxClassifier};
pub use router::prediction_router;
pub use service::{PredictionError, PredictionService};
