use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::response::Response;
use serde_json::Value;

use crate::advisor::artifacts::{BinaryClassifier, FeatureScaler};
use crate::advisor::domain::{
    CreditHistory, Gender, LoanApplication, LoanApplicationForm, MaritalStatus,
};
use crate::advisor::{advisor_router, InferenceContext, LoanAdvisorService};

/// Scenario 1: male, married, 5000 income, 150000 loan, clear credit.
pub(super) fn scenario_one() -> LoanApplication {
    LoanApplication::new(
        Gender::Male,
        MaritalStatus::Married,
        5000.0,
        150_000.0,
        CreditHistory::Clear,
    )
    .expect("scenario one is valid")
}

/// Scenario 2: female, unmarried, no income, maximum loan, unclear credit.
pub(super) fn scenario_two() -> LoanApplication {
    LoanApplication::new(
        Gender::Female,
        MaritalStatus::Unmarried,
        0.0,
        500_000.0,
        CreditHistory::Unclear,
    )
    .expect("scenario two is valid")
}

pub(super) fn form() -> LoanApplicationForm {
    LoanApplicationForm {
        gender: "Male".to_string(),
        marital_status: "Married".to_string(),
        monthly_income: 5000.0,
        loan_amount: 150_000.0,
        credit_history: "No Unclear Debts".to_string(),
    }
}

/// Scaler that passes features through unchanged.
pub(super) struct IdentityScaler {
    pub(super) dim: usize,
}

impl FeatureScaler for IdentityScaler {
    fn input_dim(&self) -> usize {
        self.dim
    }

    fn transform(&self, features: &[f64]) -> Vec<f64> {
        features.to_vec()
    }
}

/// Approves exactly when the credit-history feature is set; counts invocations.
#[derive(Default)]
pub(super) struct CreditClassifier {
    pub(super) calls: AtomicUsize,
}

impl CreditClassifier {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BinaryClassifier for CreditClassifier {
    fn input_dim(&self) -> usize {
        5
    }

    fn predict_label(&self, scaled: &[f64]) -> i64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if scaled[4] > 0.5 {
            1
        } else {
            0
        }
    }
}

/// Returns the same label for every input.
pub(super) struct ConstantClassifier {
    pub(super) dim: usize,
    pub(super) label: i64,
}

impl BinaryClassifier for ConstantClassifier {
    fn input_dim(&self) -> usize {
        self.dim
    }

    fn predict_label(&self, _scaled: &[f64]) -> i64 {
        self.label
    }
}

pub(super) fn context() -> InferenceContext<IdentityScaler, CreditClassifier> {
    InferenceContext::new(IdentityScaler { dim: 5 }, CreditClassifier::default())
        .expect("dimensions agree")
}

pub(super) fn cached_context(
    capacity: u64,
) -> (
    InferenceContext<IdentityScaler, CreditClassifier>,
    Arc<CreditClassifier>,
) {
    let classifier = Arc::new(CreditClassifier::default());
    let context =
        InferenceContext::from_shared(Arc::new(IdentityScaler { dim: 5 }), classifier.clone())
            .expect("dimensions agree")
            .with_cache(capacity);
    (context, classifier)
}

pub(super) fn build_service() -> LoanAdvisorService<IdentityScaler, CreditClassifier> {
    LoanAdvisorService::new(context())
}

pub(super) fn router() -> axum::Router {
    advisor_router(Arc::new(build_service()))
}

pub(super) fn form_body(form: &LoanApplicationForm) -> Bytes {
    Bytes::from(serde_json::to_vec(form).expect("serialize form"))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
