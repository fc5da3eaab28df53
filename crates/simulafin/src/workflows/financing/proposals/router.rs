use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ProposalDraft, ProposalSubmission, SubmissionId, SubmissionStatus};
use super::filter::{StatusFilter, SubmissionFilter};
use super::repository::SubmissionRepository;
use super::review::{AdminReviewWorkflow, ReviewError};
use crate::workflows::financing::identity::{current_user, Actor};
use crate::workflows::financing::repository::UserDirectory;

/// Query string of the admin list.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionCreated {
    pub submission_id: SubmissionId,
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListView {
    pub total: usize,
    pub matched: usize,
    pub submissions: Vec<ProposalSubmission>,
}

/// Routes for submitting proposals and for the admin review panel.
pub fn submission_router<P, U>(workflow: Arc<AdminReviewWorkflow<P, U>>) -> Router
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/submissions",
            get(own_submissions_handler::<P, U>).post(create_handler::<P, U>),
        )
        .route(
            "/api/v1/submissions/:submission_id/proposal",
            get(proposal_handler::<P, U>),
        )
        .route(
            "/api/v1/admin/submissions",
            get(admin_list_handler::<P, U>),
        )
        .route(
            "/api/v1/admin/submissions/summary",
            get(admin_summary_handler::<P, U>),
        )
        .route(
            "/api/v1/admin/submissions/:submission_id/status",
            patch(status_update_handler::<P, U>),
        )
        .with_state(workflow)
}

pub(crate) async fn create_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
    Json(draft): Json<ProposalDraft>,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let user = current_user(&headers);
    match workflow.create_submission(user.as_ref(), draft) {
        Ok(submission_id) => {
            let body = SubmissionCreated {
                submission_id,
                status: SubmissionStatus::Pending,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn own_submissions_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let user = current_user(&headers);
    match workflow.submissions_for(user.as_ref()) {
        Ok(submissions) => (StatusCode::OK, Json(submissions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn proposal_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
    Path(submission_id): Path<String>,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let actor = match resolve_actor(&workflow, &headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(err),
    };
    match workflow.proposal_document(&actor, &SubmissionId(submission_id)) {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_list_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
    Query(query): Query<SubmissionQuery>,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let actor = match resolve_actor(&workflow, &headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(err),
    };
    let status = match query
        .status
        .as_deref()
        .unwrap_or("all")
        .parse::<StatusFilter>()
    {
        Ok(status) => status,
        Err(err) => return error_response(err.into()),
    };
    let filter = SubmissionFilter::new(query.search.as_deref(), status);

    match workflow.list_submissions(&actor, filter) {
        Ok(listing) => {
            let body = SubmissionListView {
                total: listing.total(),
                matched: listing.matched(),
                submissions: listing.into_matches(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn admin_summary_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let actor = match resolve_actor(&workflow, &headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(err),
    };
    match workflow.status_summary(&actor) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_update_handler<P, U>(
    State(workflow): State<Arc<AdminReviewWorkflow<P, U>>>,
    headers: HeaderMap,
    Path(submission_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    let actor = match resolve_actor(&workflow, &headers) {
        Ok(actor) => actor,
        Err(err) => return error_response(err),
    };
    match workflow.update_status(&actor, &SubmissionId(submission_id), &request.status) {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(err) => error_response(err),
    }
}

fn resolve_actor<P, U>(
    workflow: &AdminReviewWorkflow<P, U>,
    headers: &HeaderMap,
) -> Result<Actor, ReviewError>
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    current_user(headers)
        .map(|user| workflow.actor_for(&user))
        .ok_or(ReviewError::NotAuthenticated)
}

fn error_response(err: ReviewError) -> Response {
    let status = match &err {
        ReviewError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ReviewError::Unauthorized => StatusCode::FORBIDDEN,
        ReviewError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
        ReviewError::InvalidInput(_) | ReviewError::InvalidSignature(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReviewError::NotFound => StatusCode::NOT_FOUND,
        ReviewError::TransitionRejected { .. } => StatusCode::CONFLICT,
        ReviewError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        ReviewError::Persistence(_) => {
            "could not save or load submissions, please try again".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(json!({ "error": message }))).into_response()
}
