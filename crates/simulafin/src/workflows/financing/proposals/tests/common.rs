use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::financing::identity::{
    Actor, AuthenticatedUser, UserId, UserProfile, USER_EMAIL_HEADER, USER_ID_HEADER,
};
use crate::workflows::financing::proposals::domain::{
    ProposalDraft, ProposalSubmission, SignatureCapture, SubmissionId, SubmissionStatus,
    TransitionPolicy,
};
use crate::workflows::financing::proposals::repository::SubmissionRepository;
use crate::workflows::financing::proposals::AdminReviewWorkflow;
use crate::workflows::financing::repository::{RepositoryError, UserDirectory};
use crate::workflows::financing::simulations::SimulationRequest;

pub(super) const SIGNATURE_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";

pub(super) fn ana() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId("user-ana".to_string()),
        email: "ana.souza@example.com".to_string(),
    }
}

pub(super) fn bruno() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId("user-bruno".to_string()),
        email: "bruno@example.com".to_string(),
    }
}

pub(super) fn carla_admin() -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId("user-carla".to_string()),
        email: "carla@simulafin.example".to_string(),
    }
}

pub(super) fn admin_actor() -> Actor {
    Actor::admin(&carla_admin())
}

pub(super) fn simulation_request(property_value: &str) -> SimulationRequest {
    SimulationRequest {
        property_value: property_value.to_string(),
        down_payment_percentage: 20.0,
        term_years: 30,
    }
}

pub(super) fn draft() -> ProposalDraft {
    ProposalDraft {
        simulation: simulation_request("R$ 500.000"),
        signature: SignatureCapture {
            name: "Ana Souza".to_string(),
            national_id: "123.456.789-01".to_string(),
            signature_image: SIGNATURE_PNG.to_string(),
        },
    }
}

pub(super) fn draft_for(name: &str, national_id: &str, property_value: &str) -> ProposalDraft {
    ProposalDraft {
        simulation: simulation_request(property_value),
        signature: SignatureCapture {
            name: name.to_string(),
            national_id: national_id.to_string(),
            signature_image: SIGNATURE_PNG.to_string(),
        },
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySubmissions {
    pub(super) rows: Arc<Mutex<Vec<ProposalSubmission>>>,
}

impl MemorySubmissions {
    fn newest_first(mut rows: Vec<ProposalSubmission>) -> Vec<ProposalSubmission> {
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }

    pub(super) fn stored(&self, id: &SubmissionId) -> ProposalSubmission {
        self.fetch(id)
            .expect("fetch succeeds")
            .expect("submission present")
    }
}

impl SubmissionRepository for MemorySubmissions {
    fn insert(
        &self,
        submission: ProposalSubmission,
    ) -> Result<ProposalSubmission, RepositoryError> {
        let mut guard = self.rows.lock().expect("repository mutex poisoned");
        if guard.iter().any(|row| row.id == submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(submission.clone());
        Ok(submission)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<ProposalSubmission>, RepositoryError> {
        let guard = self.rows.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|row| &row.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        let guard = self.rows.lock().expect("repository mutex poisoned");
        Ok(Self::newest_first(guard.clone()))
    }

    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        let guard = self.rows.lock().expect("repository mutex poisoned");
        let owned = guard
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(owned))
    }

    fn update_status(
        &self,
        id: &SubmissionId,
        status: SubmissionStatus,
    ) -> Result<ProposalSubmission, RepositoryError> {
        let mut guard = self.rows.lock().expect("repository mutex poisoned");
        let row = guard
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        Ok(row.clone())
    }
}

pub(super) struct OfflineSubmissions;

impl SubmissionRepository for OfflineSubmissions {
    fn insert(
        &self,
        _submission: ProposalSubmission,
    ) -> Result<ProposalSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<ProposalSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &SubmissionId,
        _status: SubmissionStatus,
    ) -> Result<ProposalSubmission, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryUsers {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl MemoryUsers {
    pub(super) fn with_defaults() -> Self {
        let users = Self::default();
        users.register(&ana(), "Ana Souza", false);
        users.register(&bruno(), "Bruno Lima", false);
        users.register(&carla_admin(), "Carla Dias", true);
        users
    }

    pub(super) fn register(&self, user: &AuthenticatedUser, name: &str, is_admin: bool) {
        let profile = UserProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            name: name.to_string(),
            is_admin,
            created_at: Utc
                .with_ymd_and_hms(2025, 1, 15, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        };
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(user.id.clone(), profile);
    }
}

impl UserDirectory for MemoryUsers {
    fn find(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnreachableUsers;

impl UserDirectory for UnreachableUsers {
    fn find(&self, _id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("auth backend timeout".to_string()))
    }
}

pub(super) fn build_workflow() -> (
    AdminReviewWorkflow<MemorySubmissions, MemoryUsers>,
    Arc<MemorySubmissions>,
) {
    build_workflow_with(TransitionPolicy::Permissive)
}

pub(super) fn build_workflow_with(
    policy: TransitionPolicy,
) -> (
    AdminReviewWorkflow<MemorySubmissions, MemoryUsers>,
    Arc<MemorySubmissions>,
) {
    let submissions = Arc::new(MemorySubmissions::default());
    let users = Arc::new(MemoryUsers::with_defaults());
    let workflow = AdminReviewWorkflow::with_policy(submissions.clone(), users, policy);
    (workflow, submissions)
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    user: Option<&AuthenticatedUser>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header(USER_ID_HEADER, user.id.0.as_str())
            .header(USER_EMAIL_HEADER, user.email.as_str());
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("json body")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
