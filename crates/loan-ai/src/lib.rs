//! Loan approval prediction service.
//!
//! The `prediction` module carries the request-to-prediction pipeline:
//! feature encoding, model selection, macroeconomic enrichment with a
//! fail-open fallback, and the HTTP surface. `config`, `error`, and
//! `telemetry` provide the process-level plumbing shared with the API
//! binary.

pub mod config;
pub mod error;
pub mod prediction;
pub mod telemetry;
