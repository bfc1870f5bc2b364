use std::fmt;

use serde::{Deserialize, Serialize};

use super::encoder::{non_negative, InvalidInput};

/// Number of features the frozen model was fitted on.
pub const FEATURE_COUNT: usize = 5;

/// Feature names in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "married",
    "applicant_income",
    "loan_amount",
    "credit_history",
];

/// Input fields collected by the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Gender,
    MaritalStatus,
    MonthlyIncome,
    LoanAmount,
    CreditHistory,
}

impl FormField {
    pub const fn name(self) -> &'static str {
        match self {
            FormField::Gender => "gender",
            FormField::MaritalStatus => "marital_status",
            FormField::MonthlyIncome => "monthly_income",
            FormField::LoanAmount => "loan_amount",
            FormField::CreditHistory => "credit_history",
        }
    }

    /// Resolve a payload key, including the model feature names accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gender" => Some(FormField::Gender),
            "marital_status" | "married" => Some(FormField::MaritalStatus),
            "monthly_income" | "applicant_income" => Some(FormField::MonthlyIncome),
            "loan_amount" => Some(FormField::LoanAmount),
            "credit_history" => Some(FormField::CreditHistory),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Unmarried,
    Married,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 2] = [MaritalStatus::Unmarried, MaritalStatus::Married];

    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Unmarried => "Unmarried",
            MaritalStatus::Married => "Married",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unmarried" => Some(MaritalStatus::Unmarried),
            "married" => Some(MaritalStatus::Married),
            _ => None,
        }
    }
}

/// Whether the applicant carries unclear debts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditHistory {
    Unclear,
    Clear,
}

impl CreditHistory {
    pub const ALL: [CreditHistory; 2] = [CreditHistory::Unclear, CreditHistory::Clear];

    pub const fn label(self) -> &'static str {
        match self {
            CreditHistory::Unclear => "Unclear",
            CreditHistory::Clear => "Clear",
        }
    }

    /// Wording shown on the form's select box.
    pub const fn form_label(self) -> &'static str {
        match self {
            CreditHistory::Unclear => "Unclear Debts",
            CreditHistory::Clear => "No Unclear Debts",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unclear" | "unclear debts" => Some(CreditHistory::Unclear),
            "clear" | "no unclear" | "no unclear debts" => Some(CreditHistory::Clear),
            _ => None,
        }
    }
}

/// Raw, unvalidated form payload as submitted over HTTP, CLI flags, or a CSV row.
///
/// `married` and `applicant_income` are accepted as aliases so payloads keyed by the
/// model's [`FEATURE_NAMES`] deserialize too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplicationForm {
    pub gender: String,
    #[serde(alias = "married")]
    pub marital_status: String,
    #[serde(alias = "applicant_income")]
    pub monthly_income: f64,
    pub loan_amount: f64,
    pub credit_history: String,
}

/// Validated applicant attributes, held for a single request.
///
/// Amounts are always finite and non-negative: the only ways in are [`LoanApplication::new`]
/// and deserialization, which runs the same validation as a submitted form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LoanApplicationForm")]
pub struct LoanApplication {
    gender: Gender,
    marital_status: MaritalStatus,
    monthly_income: f64,
    loan_amount: f64,
    credit_history: CreditHistory,
}

impl LoanApplication {
    pub fn new(
        gender: Gender,
        marital_status: MaritalStatus,
        monthly_income: f64,
        loan_amount: f64,
        credit_history: CreditHistory,
    ) -> Result<Self, InvalidInput> {
        Ok(Self {
            gender,
            marital_status,
            monthly_income: non_negative(FormField::MonthlyIncome, monthly_income)?,
            loan_amount: non_negative(FormField::LoanAmount, loan_amount)?,
            credit_history,
        })
    }

    pub fn with_credit_history(self, credit_history: CreditHistory) -> Self {
        Self {
            credit_history,
            ..self
        }
    }

    pub const fn gender(&self) -> Gender {
        self.gender
    }

    pub const fn marital_status(&self) -> MaritalStatus {
        self.marital_status
    }

    pub const fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    /// Requested amount in USD.
    pub const fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub const fn credit_history(&self) -> CreditHistory {
        self.credit_history
    }
}

impl From<&LoanApplication> for LoanApplicationForm {
    fn from(application: &LoanApplication) -> Self {
        Self {
            gender: application.gender.label().to_string(),
            marital_status: application.marital_status.label().to_string(),
            monthly_income: application.monthly_income,
            loan_amount: application.loan_amount,
            credit_history: application.credit_history.label().to_string(),
        }
    }
}

/// Model input in the fixed order of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    /// Class label 1 approves; every other label rejects.
    pub const fn from_class_label(label: i64) -> Self {
        if label == 1 {
            Verdict::Approved
        } else {
            Verdict::Rejected
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::Rejected => "Rejected",
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Verdict::Approved)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one encode and predict cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    pub application: LoanApplication,
    pub features: FeatureVector,
    pub verdict: Verdict,
}
