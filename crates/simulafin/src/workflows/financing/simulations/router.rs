use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{SimulationId, SimulationRequest};
use super::repository::SimulationRepository;
use super::service::{SimulationService, SimulationServiceError};
use crate::workflows::financing::amortization::{FinancingSummary, SimulationResult};
use crate::workflows::financing::identity::current_user;

/// Response body for a freshly computed simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView {
    pub result: SimulationResult,
    pub financing: FinancingSummary,
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_id: Option<SimulationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

/// Routes for computing and managing saved simulations.
pub fn simulation_router<S>(service: Arc<SimulationService<S>>) -> Router
where
    S: SimulationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/simulations",
            post(simulate_handler::<S>).get(list_handler::<S>),
        )
        .route(
            "/api/v1/simulations/:simulation_id",
            delete(delete_handler::<S>),
        )
        .with_state(service)
}

/// Computes for everyone; saves only when the caller is signed in.
pub(crate) async fn simulate_handler<S>(
    State(service): State<Arc<SimulationService<S>>>,
    headers: HeaderMap,
    Json(request): Json<SimulationRequest>,
) -> Response
where
    S: SimulationRepository + 'static,
{
    let (input, result) = match service.simulate(&request) {
        Ok(computed) => computed,
        Err(err) => return error_response(err),
    };

    let mut view = SimulationView {
        result,
        financing: FinancingSummary::new(&input, &result),
        saved: false,
        simulation_id: None,
        notice: None,
    };

    if let Some(user) = current_user(&headers) {
        match service.store(&user, &input, &result) {
            Ok(record) => {
                view.saved = true;
                view.simulation_id = Some(record.id);
            }
            Err(_) => view.notice = Some("simulation computed but could not be saved"),
        }
    }

    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<SimulationService<S>>>,
    headers: HeaderMap,
) -> Response
where
    S: SimulationRepository + 'static,
{
    let user = current_user(&headers);
    match service.list_for(user.as_ref()) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<SimulationService<S>>>,
    headers: HeaderMap,
    Path(simulation_id): Path<String>,
) -> Response
where
    S: SimulationRepository + 'static,
{
    let user = current_user(&headers);
    match service.delete(user.as_ref(), &SimulationId(simulation_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: SimulationServiceError) -> Response {
    let (status, message) = match &err {
        SimulationServiceError::InvalidInput(inner) => {
            (StatusCode::UNPROCESSABLE_ENTITY, inner.to_string())
        }
        SimulationServiceError::NotAuthenticated => (StatusCode::UNAUTHORIZED, err.to_string()),
        SimulationServiceError::Unauthorized => (StatusCode::FORBIDDEN, err.to_string()),
        SimulationServiceError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        SimulationServiceError::Persistence(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "could not reach saved simulations, please try again".to_string(),
        ),
    };
    (status, Json(json!({ "error": message }))).into_response()
}
