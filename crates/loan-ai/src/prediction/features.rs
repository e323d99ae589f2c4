//! Feature encoding and model selection.
//!
//! Column order is a contract with the serialized model artifacts: the
//! classifiers are fixed-schema and silently misinterpret misordered
//! columns. The orderings live here as named schemas and everything that
//! builds a row goes through them.

use super::domain::{LoanApplication, ModelKind};
use super::indicators::MacroIndicators;

/// Column order the basic classifier was trained on.
pub const BASIC_COLUMNS: [&str; 13] = [
    "customer_age",
    "employment_type",
    "monthly_income",
    "credit_score",
    "time_in_job_months",
    "loan_amount",
    "loan_term_months",
    "loan_type",
    "loan_purpose",
    "existing_loan_count",
    "existing_emi_total",
    "dti_ratio",
    "prev_defaults_count",
];

/// Column order the macro-enriched classifier was trained on: the basic
/// columns plus the four indicator columns appended in this exact order.
pub const MACRO_COLUMNS: [&str; 17] = [
    "customer_age",
    "employment_type",
    "monthly_income",
    "credit_score",
    "time_in_job_months",
    "loan_amount",
    "loan_term_months",
    "loan_type",
    "loan_purpose",
    "existing_loan_count",
    "existing_emi_total",
    "dti_ratio",
    "prev_defaults_count",
    "employment_rate",
    "interest_rate",
    "inflation_rate",
    "gdp_growth_rate",
];

/// Loan amount at or above which the macro-enriched model is used.
pub const MACRO_LOAN_AMOUNT_THRESHOLD: f64 = 500_000.0;

/// Expected input schema for a model variant.
pub fn schema_for(kind: ModelKind) -> &'static [&'static str] {
    match kind {
        ModelKind::Basic => &BASIC_COLUMNS,
        ModelKind::Macro => &MACRO_COLUMNS,
    }
}

/// Pure model-selection rule over the loan amount and the encoded loan
/// type/purpose codes. Re-derivable at any point in a request: it decides
/// both which classifier runs and which columns are appended.
pub fn select_model(application: &LoanApplication) -> ModelKind {
    let macro_type = matches!(application.loan_type.code(), 1 | 3);
    let macro_purpose = matches!(application.loan_purpose.code(), 3 | 4);

    if application.loan_amount >= MACRO_LOAN_AMOUNT_THRESHOLD || macro_type || macro_purpose {
        ModelKind::Macro
    } else {
        ModelKind::Basic
    }
}

/// Application with categorical fields substituted by their trained integer
/// codes and the unused `application_month` dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedApplication {
    pub customer_age: f32,
    pub employment_type: f32,
    pub monthly_income: f32,
    pub credit_score: f32,
    pub time_in_job_months: f32,
    pub loan_amount: f32,
    pub loan_term_months: f32,
    pub loan_type: f32,
    pub loan_purpose: f32,
    pub existing_loan_count: f32,
    pub existing_emi_total: f32,
    pub dti_ratio: f32,
    pub prev_defaults_count: f32,
}

impl EncodedApplication {
    pub fn encode(application: &LoanApplication) -> Self {
        Self {
            customer_age: application.customer_age as f32,
            employment_type: f32::from(application.employment_type.code()),
            monthly_income: application.monthly_income as f32,
            credit_score: application.credit_score as f32,
            time_in_job_months: application.time_in_job_months as f32,
            loan_amount: application.loan_amount as f32,
            loan_term_months: application.loan_term_months as f32,
            loan_type: f32::from(application.loan_type.code()),
            loan_purpose: f32::from(application.loan_purpose.code()),
            existing_loan_count: application.existing_loan_count as f32,
            existing_emi_total: application.existing_emi_total as f32,
            dti_ratio: application.dti_ratio as f32,
            prev_defaults_count: application.prev_defaults_count as f32,
        }
    }

    /// Row in [`BASIC_COLUMNS`] order.
    pub fn basic_row(&self) -> Vec<f32> {
        vec![
            self.customer_age,
            self.employment_type,
            self.monthly_income,
            self.credit_score,
            self.time_in_job_months,
            self.loan_amount,
            self.loan_term_months,
            self.loan_type,
            self.loan_purpose,
            self.existing_loan_count,
            self.existing_emi_total,
            self.dti_ratio,
            self.prev_defaults_count,
        ]
    }

    /// Row in [`MACRO_COLUMNS`] order with the indicator set appended.
    pub fn macro_row(&self, indicators: &MacroIndicators) -> Vec<f32> {
        let mut row = self.basic_row();
        row.extend([
            indicators.employment_rate as f32,
            indicators.interest_rate as f32,
            indicators.inflation_rate as f32,
            indicators.gdp_growth_rate as f32,
        ]);
        row
    }
}
