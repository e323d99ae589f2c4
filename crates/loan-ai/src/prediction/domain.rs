use serde::{Deserialize, Serialize};

/// Inbound loan application payload.
///
/// Constructed once per request, validated before scoring, read-only
/// afterwards. `application_month` is accepted for wire compatibility but
/// never reaches the models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub application_month: String,
    pub customer_age: u32,
    pub employment_type: EmploymentType,
    pub monthly_income: f64,
    pub credit_score: u32,
    pub time_in_job_months: u32,
    pub loan_amount: f64,
    pub loan_term_months: u32,
    pub loan_type: LoanType,
    pub loan_purpose: LoanPurpose,
    pub existing_loan_count: u32,
    pub existing_emi_total: f64,
    pub dti_ratio: f64,
    pub prev_defaults_count: u32,
}

impl LoanApplication {
    /// Bounds checks the schema layer cannot express. Unknown categorical
    /// strings never get this far: the closed enums reject them during
    /// deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_age <= 17 {
            return Err(ValidationError::UnderageApplicant {
                found: self.customer_age,
            });
        }
        if self.loan_term_months == 0 {
            return Err(ValidationError::ZeroLoanTerm);
        }

        for (field, value) in [
            ("monthly_income", self.monthly_income),
            ("loan_amount", self.loan_amount),
            ("existing_emi_total", self.existing_emi_total),
            ("dti_ratio", self.dti_ratio),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }

        if self.monthly_income < 0.0 {
            return Err(ValidationError::NegativeAmount {
                field: "monthly_income",
                found: self.monthly_income,
            });
        }
        if self.loan_amount < 0.0 {
            return Err(ValidationError::NegativeAmount {
                field: "loan_amount",
                found: self.loan_amount,
            });
        }

        Ok(())
    }
}

/// Validation errors surfaced to the caller as client errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("customer_age must exceed 17 (found {found})")]
    UnderageApplicant { found: u32 },
    #[error("loan_term_months must be at least 1")]
    ZeroLoanTerm,
    #[error("{field} must not be negative (found {found})")]
    NegativeAmount { field: &'static str, found: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },
}

/// Employment categories the models were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    Salaried,
    #[serde(rename = "Self-Employed")]
    SelfEmployed,
}

impl EmploymentType {
    /// Integer code used during training.
    pub const fn code(self) -> u8 {
        match self {
            EmploymentType::Salaried => 0,
            EmploymentType::SelfEmployed => 1,
        }
    }
}

/// Loan product categories the models were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    Personal,
    Home,
    Auto,
    Business,
}

impl LoanType {
    pub const fn code(self) -> u8 {
        match self {
            LoanType::Personal => 0,
            LoanType::Home => 1,
            LoanType::Auto => 2,
            LoanType::Business => 3,
        }
    }
}

/// Declared purpose categories the models were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanPurpose {
    Education,
    Business,
    #[serde(rename = "Medical Emergency")]
    MedicalEmergency,
    #[serde(rename = "Business Expansion")]
    BusinessExpansion,
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
    #[serde(rename = "Vehicle Purchase")]
    VehiclePurchase,
    Wedding,
}

impl LoanPurpose {
    pub const fn code(self) -> u8 {
        match self {
            LoanPurpose::Education => 0,
            LoanPurpose::Business => 1,
            LoanPurpose::MedicalEmergency => 2,
            LoanPurpose::BusinessExpansion => 3,
            LoanPurpose::HomeImprovement => 4,
            LoanPurpose::VehiclePurchase => 5,
            LoanPurpose::Wedding => 6,
        }
    }
}

/// Which of the two pretrained classifiers served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Basic,
    Macro,
}

impl ModelKind {
    pub const fn label(self) -> &'static str {
        match self {
            ModelKind::Basic => "basic",
            ModelKind::Macro => "macro",
        }
    }
}

/// Response body for `POST /predict`. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub loan_approved: bool,
    pub confidence: f64,
    pub model_used: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> LoanApplication {
        LoanApplication {
            application_month: "2025-06".to_string(),
            customer_age: 30,
            employment_type: EmploymentType::Salaried,
            monthly_income: 5200.0,
            credit_score: 710,
            time_in_job_months: 36,
            loan_amount: 100_000.0,
            loan_term_months: 60,
            loan_type: LoanType::Personal,
            loan_purpose: LoanPurpose::Education,
            existing_loan_count: 1,
            existing_emi_total: 250.0,
            dti_ratio: 0.21,
            prev_defaults_count: 0,
        }
    }

    #[test]
    fn valid_application_passes() {
        assert!(application().validate().is_ok());
    }

    #[test]
    fn rejects_underage_applicant() {
        let mut app = application();
        app.customer_age = 17;
        assert!(matches!(
            app.validate(),
            Err(ValidationError::UnderageApplicant { found: 17 })
        ));
    }

    #[test]
    fn rejects_negative_loan_amount() {
        let mut app = application();
        app.loan_amount = -1.0;
        assert!(matches!(
            app.validate(),
            Err(ValidationError::NegativeAmount {
                field: "loan_amount",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan_dti() {
        let mut app = application();
        app.dti_ratio = f64::NAN;
        assert!(matches!(
            app.validate(),
            Err(ValidationError::NonFiniteValue { field: "dti_ratio" })
        ));
    }

    #[test]
    fn unknown_category_fails_deserialization() {
        let mut raw = serde_json::to_value(application()).expect("serialize");
        raw["loan_purpose"] = serde_json::json!("Yacht Purchase");
        let parsed: Result<LoanApplication, _> = serde_json::from_value(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn spaced_category_names_round_trip() {
        let json = serde_json::json!("Medical Emergency");
        let purpose: LoanPurpose = serde_json::from_value(json).expect("known purpose");
        assert_eq!(purpose, LoanPurpose::MedicalEmergency);
        assert_eq!(purpose.code(), 2);

        let employment: EmploymentType =
            serde_json::from_value(serde_json::json!("Self-Employed")).expect("known type");
        assert_eq!(employment.code(), 1);
    }
}
