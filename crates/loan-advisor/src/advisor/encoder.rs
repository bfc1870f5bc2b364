use super::domain::{
    CreditHistory, FeatureVector, FormField, Gender, LoanApplication, LoanApplicationForm,
    MaritalStatus,
};

/// Loan amounts were in thousands of USD when the model was fitted.
pub const LOAN_AMOUNT_UNIT: f64 = 1000.0;

/// Validation errors raised while turning a raw form into a [`LoanApplication`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field}: unrecognized value '{value}' (expected one of {expected})")]
    UnknownChoice {
        field: FormField,
        value: String,
        expected: &'static str,
    },
    #[error("{field}: must be zero or greater (found {value})")]
    Negative { field: FormField, value: f64 },
    #[error("{field}: must be a finite number")]
    NotFinite { field: FormField },
}

impl InvalidInput {
    pub fn field(&self) -> FormField {
        match self {
            InvalidInput::UnknownChoice { field, .. }
            | InvalidInput::Negative { field, .. }
            | InvalidInput::NotFinite { field } => *field,
        }
    }
}

impl TryFrom<LoanApplicationForm> for LoanApplication {
    type Error = InvalidInput;

    fn try_from(form: LoanApplicationForm) -> Result<Self, Self::Error> {
        validate(&form)
    }
}

impl TryFrom<&LoanApplicationForm> for LoanApplication {
    type Error = InvalidInput;

    fn try_from(form: &LoanApplicationForm) -> Result<Self, Self::Error> {
        validate(form)
    }
}

/// Check every field of the form, reporting the first offending one.
pub fn validate(form: &LoanApplicationForm) -> Result<LoanApplication, InvalidInput> {
    let gender = Gender::from_label(&form.gender).ok_or_else(|| InvalidInput::UnknownChoice {
        field: FormField::Gender,
        value: form.gender.clone(),
        expected: "Male, Female",
    })?;

    let marital_status = MaritalStatus::from_label(&form.marital_status).ok_or_else(|| {
        InvalidInput::UnknownChoice {
            field: FormField::MaritalStatus,
            value: form.marital_status.clone(),
            expected: "Unmarried, Married",
        }
    })?;

    let credit_history = CreditHistory::from_label(&form.credit_history).ok_or_else(|| {
        InvalidInput::UnknownChoice {
            field: FormField::CreditHistory,
            value: form.credit_history.clone(),
            expected: "Unclear Debts, No Unclear Debts",
        }
    })?;

    LoanApplication::new(
        gender,
        marital_status,
        form.monthly_income,
        form.loan_amount,
        credit_history,
    )
}

pub(super) fn non_negative(field: FormField, value: f64) -> Result<f64, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InvalidInput::Negative { field, value });
    }
    // -0.0 passes the check above; store it as 0.0 so encodings stay bit-identical.
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Map a validated application onto the model's feature order.
pub fn encode(application: &LoanApplication) -> FeatureVector {
    let gender = match application.gender() {
        Gender::Male => 0.0,
        Gender::Female => 1.0,
    };
    let married = match application.marital_status() {
        MaritalStatus::Unmarried => 0.0,
        MaritalStatus::Married => 1.0,
    };
    let credit_history = match application.credit_history() {
        CreditHistory::Unclear => 0.0,
        CreditHistory::Clear => 1.0,
    };

    FeatureVector([
        gender,
        married,
        application.monthly_income(),
        application.loan_amount() / LOAN_AMOUNT_UNIT,
        credit_history,
    ])
}
