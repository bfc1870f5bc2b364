//! Loan application intake, feature encoding, and frozen-model inference.
//!
//! Requests flow form -> [`encoder::validate`] -> [`encoder::encode`] ->
//! [`InferenceContext::predict`]. The scaler and classifier are loaded once and shared
//! read-only; the only mutable state is the optional bounded prediction cache.

pub mod artifacts;
pub mod batch;
pub(crate) mod cache;
pub mod domain;
pub mod encoder;
pub mod form;
pub mod inference;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use artifacts::{
    ArtifactError, ArtifactKind, BinaryClassifier, FeatureScaler, LinearClassifier,
    StandardScaler,
};
pub use batch::{score_csv, BatchError, BatchRow, RowOutcome};
pub use cache::PredictionCache;
pub use domain::{
    Assessment, CreditHistory, FeatureVector, FormField, Gender, LoanApplication,
    LoanApplicationForm, MaritalStatus, Verdict, FEATURE_COUNT, FEATURE_NAMES,
};
pub use encoder::{encode, validate, InvalidInput, LOAN_AMOUNT_UNIT};
pub use form::{FaqEntry, FieldControl, FieldDefinition, FormDefinition};
pub use inference::{InferenceContext, InferenceError};
pub use router::{advisor_router, PredictionView};
pub use service::{AdvisorError, LoanAdvisorService};
