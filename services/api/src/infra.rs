use crate::cli::ModelArgs;
use loan_advisor::advisor::{
    InferenceContext, LinearClassifier, LoanAdvisorService, StandardScaler,
};
use loan_advisor::config::AppConfig;
use loan_advisor::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type DefaultAdvisor = LoanAdvisorService<StandardScaler, LinearClassifier>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration with CLI overrides applied to the model section.
pub(crate) fn load_config(models: ModelArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    models.apply(&mut config.model);
    Ok(config)
}

/// Load the frozen artifacts. Callers must treat failure as fatal.
pub(crate) fn load_advisor(config: &AppConfig) -> Result<Arc<DefaultAdvisor>, AppError> {
    let context = InferenceContext::load(&config.model)?;
    Ok(Arc::new(LoanAdvisorService::new(context)))
}
