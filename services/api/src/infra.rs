use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use simulafin::workflows::financing::proposals::{
    ProposalSubmission, SubmissionId, SubmissionRepository, SubmissionStatus,
};
use simulafin::workflows::financing::simulations::{
    SimulationId, SimulationRecord, SimulationRepository,
};
use simulafin::workflows::financing::{RepositoryError, UserDirectory, UserId, UserProfile};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySimulationRepository {
    records: Arc<Mutex<HashMap<SimulationId, SimulationRecord>>>,
}

impl SimulationRepository for InMemorySimulationRepository {
    fn insert(&self, record: SimulationRecord) -> Result<SimulationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SimulationId) -> Result<Option<SimulationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<SimulationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut owned: Vec<_> = guard
            .values()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(owned)
    }

    fn delete(&self, id: &SimulationId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, ProposalSubmission>>>,
}

impl InMemorySubmissionRepository {
    fn newest_first(mut rows: Vec<ProposalSubmission>) -> Vec<ProposalSubmission> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows
    }
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(
        &self,
        submission: ProposalSubmission,
    ) -> Result<ProposalSubmission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<ProposalSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(Self::newest_first(guard.values().cloned().collect()))
    }

    fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProposalSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let owned = guard
            .values()
            .filter(|submission| &submission.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(owned))
    }

    fn update_status(
        &self,
        id: &SubmissionId,
        status: SubmissionStatus,
    ) -> Result<ProposalSubmission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let submission = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        submission.status = status;
        Ok(submission.clone())
    }
}

/// Profiles known to the service. Users missing from the directory are treated as clients.
#[derive(Default, Clone)]
pub(crate) struct InMemoryUserDirectory {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryUserDirectory {
    pub(crate) fn with_admins(admin_ids: &[UserId]) -> Self {
        let directory = Self::default();
        for id in admin_ids {
            directory.register(UserProfile {
                id: id.clone(),
                email: String::new(),
                name: id.0.clone(),
                is_admin: true,
                created_at: Utc::now(),
            });
        }
        directory
    }

    pub(crate) fn register(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.id.clone(), profile);
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
