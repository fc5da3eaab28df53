use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemorySimulationRepository, InMemorySubmissionRepository, InMemoryUserDirectory,
};
use crate::routes::with_financing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use simulafin::config::AppConfig;
use simulafin::error::AppError;
use simulafin::telemetry;
use simulafin::workflows::financing::proposals::AdminReviewWorkflow;
use simulafin::workflows::financing::simulations::SimulationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let simulations = Arc::new(SimulationService::new(Arc::new(
        InMemorySimulationRepository::default(),
    )));
    let users = Arc::new(InMemoryUserDirectory::with_admins(
        &config.review.admin_user_ids,
    ));
    let review = Arc::new(AdminReviewWorkflow::with_policy(
        Arc::new(InMemorySubmissionRepository::default()),
        users,
        config.review.transition_policy,
    ));

    let app = with_financing_routes(simulations, review)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.review.transition_policy,
        admins = config.review.admin_user_ids.len(),
        "financing simulator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
