use std::sync::Arc;

use tracing::{debug, info};

use super::artifacts::{BinaryClassifier, FeatureScaler};
use super::domain::{Assessment, LoanApplication, LoanApplicationForm, Verdict};
use super::encoder::{self, InvalidInput};
use super::inference::{InferenceContext, InferenceError};

/// Service composing validation, the feature encoder, and the inference context.
pub struct LoanAdvisorService<S, C> {
    context: Arc<InferenceContext<S, C>>,
}

impl<S, C> LoanAdvisorService<S, C>
where
    S: FeatureScaler + 'static,
    C: BinaryClassifier + 'static,
{
    pub fn new(context: InferenceContext<S, C>) -> Self {
        Self::with_context(Arc::new(context))
    }

    pub fn with_context(context: Arc<InferenceContext<S, C>>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &InferenceContext<S, C> {
        &self.context
    }

    /// Validate a raw form, encode it, and predict a verdict.
    pub fn assess(&self, form: &LoanApplicationForm) -> Result<Assessment, AdvisorError> {
        let application = match encoder::validate(form) {
            Ok(application) => application,
            Err(err) => {
                debug!(field = %err.field(), error = %err, "loan application rejected at intake");
                return Err(err.into());
            }
        };

        let features = encoder::encode(&application);
        let verdict = self.context.predict(&features)?;

        info!(%verdict, "loan application assessed");
        Ok(Assessment {
            application,
            features,
            verdict,
        })
    }

    /// Predict for an already validated application.
    pub fn verdict_for(&self, application: &LoanApplication) -> Result<Verdict, AdvisorError> {
        let features = encoder::encode(application);
        Ok(self.context.predict(&features)?)
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}
