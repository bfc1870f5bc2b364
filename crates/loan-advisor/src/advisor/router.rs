use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::error::Category;
use serde_json::json;
use serde_path_to_error::Segment;

use super::artifacts::{BinaryClassifier, FeatureScaler};
use super::domain::{FeatureVector, FormField, LoanApplicationForm, Verdict};
use super::form::FormDefinition;
use super::service::{AdvisorError, LoanAdvisorService};

/// Body returned by the prediction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub verdict: Verdict,
    pub features: FeatureVector,
}

/// Router builder exposing the form definition and the prediction endpoint.
pub fn advisor_router<S, C>(service: Arc<LoanAdvisorService<S, C>>) -> Router
where
    S: FeatureScaler + 'static,
    C: BinaryClassifier + 'static,
{
    Router::new()
        .route("/api/v1/loan/form", get(form_handler))
        .route("/api/v1/loan/predict", post(predict_handler::<S, C>))
        .with_state(service)
}

pub(crate) async fn form_handler() -> Json<FormDefinition> {
    Json(FormDefinition::standard())
}

pub(crate) async fn predict_handler<S, C>(
    State(service): State<Arc<LoanAdvisorService<S, C>>>,
    body: Bytes,
) -> Response
where
    S: FeatureScaler + 'static,
    C: BinaryClassifier + 'static,
{
    let form = match parse_form(&body) {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection.message, "prediction payload rejected");
            return rejection.into_response();
        }
    };

    match service.assess(&form) {
        Ok(assessment) => {
            let view = PredictionView {
                verdict: assessment.verdict,
                features: assessment.features,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(AdvisorError::InvalidInput(error)) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(AdvisorError::Inference(error)) => {
            tracing::error!(%error, "model rejected encoded features");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// A prediction body that could not be read as a form, answered in the same shape as a
/// validation failure.
#[derive(Debug)]
pub(crate) struct PayloadRejection {
    status: StatusCode,
    field: Option<FormField>,
    message: String,
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.message,
            "field": self.field,
        });
        (self.status, Json(payload)).into_response()
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for PayloadRejection {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let field = err
            .path()
            .iter()
            .find_map(|segment| match segment {
                Segment::Map { key } => FormField::from_name(key),
                _ => None,
            })
            .or_else(|| missing_field(&err.inner().to_string()));
        let status = match err.inner().classify() {
            Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_REQUEST,
        };

        Self {
            status,
            field,
            message: err.to_string(),
        }
    }
}

pub(crate) fn parse_form(body: &[u8]) -> Result<LoanApplicationForm, PayloadRejection> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let form = serde_path_to_error::deserialize(&mut deserializer)?;
    deserializer.end().map_err(|err| PayloadRejection {
        status: StatusCode::BAD_REQUEST,
        field: None,
        message: err.to_string(),
    })?;
    Ok(form)
}

/// serde reports absent keys against the enclosing struct, so the name is only in the message.
fn missing_field(message: &str) -> Option<FormField> {
    let name = message.strip_prefix("missing field `")?.split('`').next()?;
    FormField::from_name(name)
}
