use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use simulafin::workflows::financing::proposals::{
    submission_router, AdminReviewWorkflow, SubmissionRepository,
};
use simulafin::workflows::financing::simulations::{
    simulation_router, SimulationRepository, SimulationService,
};
use simulafin::workflows::financing::UserDirectory;
use std::sync::Arc;

pub(crate) fn with_financing_routes<S, P, U>(
    simulations: Arc<SimulationService<S>>,
    review: Arc<AdminReviewWorkflow<P, U>>,
) -> Router
where
    S: SimulationRepository + 'static,
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    simulation_router(simulations)
        .merge(submission_router(review))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
