use serde::Serialize;

use super::domain::{CreditHistory, FormField, Gender, MaritalStatus};

pub const MONTHLY_INCOME_MAX: u32 = 20_000;
pub const MONTHLY_INCOME_STEP: u32 = 500;
pub const LOAN_AMOUNT_MAX: u32 = 500_000;
pub const LOAN_AMOUNT_STEP: u32 = 1_000;

/// Definition of the single-page application form rendered by the front end.
#[derive(Debug, Clone, Serialize)]
pub struct FormDefinition {
    pub title: &'static str,
    pub tagline: &'static str,
    pub submit_label: &'static str,
    pub fields: Vec<FieldDefinition>,
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub field: FormField,
    pub label: &'static str,
    pub help: &'static str,
    pub control: FieldControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldControl {
    Radio { options: Vec<&'static str> },
    Select { options: Vec<&'static str> },
    Slider { min: u32, max: u32, step: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

impl FormDefinition {
    pub fn standard() -> Self {
        Self {
            title: "Smart Loan Approval Advisor",
            tagline: "Make data-driven loan decisions with confidence.",
            submit_label: "Predict My Loan Status",
            fields: vec![
                FieldDefinition {
                    field: FormField::Gender,
                    label: "Select your Gender:",
                    help: "Choose your gender.",
                    control: FieldControl::Radio {
                        options: Gender::ALL.iter().map(|gender| gender.label()).collect(),
                    },
                },
                FieldDefinition {
                    field: FormField::MaritalStatus,
                    label: "Marital Status:",
                    help: "Choose your marital status.",
                    control: FieldControl::Radio {
                        options: MaritalStatus::ALL
                            .iter()
                            .map(|status| status.label())
                            .collect(),
                    },
                },
                FieldDefinition {
                    field: FormField::MonthlyIncome,
                    label: "Applicant's Monthly Income (in USD)",
                    help: "Enter your monthly income.",
                    control: FieldControl::Slider {
                        min: 0,
                        max: MONTHLY_INCOME_MAX,
                        step: MONTHLY_INCOME_STEP,
                    },
                },
                FieldDefinition {
                    field: FormField::LoanAmount,
                    label: "Loan Amount Requested (in USD)",
                    help: "Choose the loan amount you're applying for.",
                    control: FieldControl::Slider {
                        min: 0,
                        max: LOAN_AMOUNT_MAX,
                        step: LOAN_AMOUNT_STEP,
                    },
                },
                FieldDefinition {
                    field: FormField::CreditHistory,
                    label: "Credit History Status:",
                    help: "Choose your credit status.",
                    control: FieldControl::Select {
                        options: CreditHistory::ALL
                            .iter()
                            .map(|history| history.form_label())
                            .collect(),
                    },
                },
            ],
            faq: vec![
                FaqEntry {
                    question: "How does this app make predictions?",
                    answer: "A machine learning model trained on historical loan data weighs \
                             gender, marital status, income, loan amount, and credit history \
                             to predict whether an application will be approved or rejected.",
                },
                FaqEntry {
                    question: "Is my information secure?",
                    answer: "Inputs are scored in memory for the current request only; \
                             nothing is stored or shared.",
                },
                FaqEntry {
                    question: "Why was my application rejected?",
                    answer: "Rejections usually follow from low income, a high requested loan \
                             amount, or unclear credit history. Each factor affects the outcome \
                             and approval is never guaranteed.",
                },
            ],
        }
    }

    pub fn field(&self, field: FormField) -> Option<&FieldDefinition> {
        self.fields.iter().find(|definition| definition.field == field)
    }
}
