use crate::cli::ServeArgs;
use crate::infra::{load_advisor, load_config, AppState};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_advisor::error::AppError;
use loan_advisor::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(args: ServeArgs) -> Result<(), AppError> {
    let ServeArgs { host, port, models } = args;
    let mut config = load_config(models)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let advisor = match load_advisor(&config) {
        Ok(advisor) => advisor,
        Err(err) => {
            error!(error = %err, "model artifacts unavailable; refusing to serve");
            return Err(err);
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_advisor_routes(advisor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan approval advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
