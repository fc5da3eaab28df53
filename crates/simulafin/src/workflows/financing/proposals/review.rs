use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::document::ProposalDocument;
use super::domain::{
    ProposalDraft, ProposalSubmission, SignatureError, StatusSummary, SubmissionId,
    SubmissionStatus, TransitionPolicy, UnknownStatus,
};
use super::filter::{SubmissionFilter, SubmissionListing};
use super::repository::SubmissionRepository;
use crate::workflows::financing::amortization::{AmortizationError, FinancingSummary};
use crate::workflows::financing::identity::{Actor, AuthenticatedUser, UserId};
use crate::workflows::financing::repository::{RepositoryError, UserDirectory};

/// Authorization gate and orchestration for proposal submissions.
pub struct AdminReviewWorkflow<P, U> {
    submissions: Arc<P>,
    users: Arc<U>,
    policy: TransitionPolicy,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<P, U> AdminReviewWorkflow<P, U>
where
    P: SubmissionRepository + 'static,
    U: UserDirectory + 'static,
{
    pub fn new(submissions: Arc<P>, users: Arc<U>) -> Self {
        Self::with_policy(submissions, users, TransitionPolicy::default())
    }

    pub fn with_policy(submissions: Arc<P>, users: Arc<U>, policy: TransitionPolicy) -> Self {
        Self {
            submissions,
            users,
            policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Administrator flag lookup. Unknown users and lookup failures count as non-admin.
    pub fn check_is_admin(&self, user_id: &UserId) -> bool {
        match self.users.find(user_id) {
            Ok(Some(profile)) => profile.is_admin,
            Ok(None) => false,
            Err(err) => {
                warn!(user_id = %user_id.0, error = %err, "admin lookup failed; denying");
                false
            }
        }
    }

    pub fn actor_for(&self, user: &AuthenticatedUser) -> Actor {
        Actor {
            user_id: user.id.clone(),
            email: user.email.clone(),
            is_admin: self.check_is_admin(&user.id),
        }
    }

    /// Sign and submit a simulation. The financing figures are recomputed from the draft inputs.
    pub fn create_submission(
        &self,
        user: Option<&AuthenticatedUser>,
        draft: ProposalDraft,
    ) -> Result<SubmissionId, ReviewError> {
        let user = user.ok_or(ReviewError::NotAuthenticated)?;
        let ProposalDraft {
            simulation,
            signature,
        } = draft;

        let input = simulation.to_input()?;
        let result = input.compute()?;
        let now = Utc::now();
        let signer = signature.into_identity(now)?;

        let submission = ProposalSubmission {
            id: next_submission_id(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            signer,
            financing: FinancingSummary::new(&input, &result),
            status: SubmissionStatus::Pending,
            created_at: now,
        };

        let stored = self
            .submissions
            .insert(submission)
            .map_err(|err| persistence("insert submission", err))?;
        info!(submission_id = %stored.id.0, user_id = %stored.user_id.0, "proposal submitted");
        Ok(stored.id)
    }

    /// The caller's own submissions, newest first.
    pub fn submissions_for(
        &self,
        user: Option<&AuthenticatedUser>,
    ) -> Result<Vec<ProposalSubmission>, ReviewError> {
        let user = user.ok_or(ReviewError::NotAuthenticated)?;
        self.submissions
            .list_for_user(&user.id)
            .map_err(|err| persistence("list user submissions", err))
    }

    pub fn list_submissions(
        &self,
        actor: &Actor,
        filter: SubmissionFilter,
    ) -> Result<SubmissionListing, ReviewError> {
        require_admin(actor)?;
        let snapshot = self
            .submissions
            .list()
            .map_err(|err| persistence("list submissions", err))?;
        Ok(SubmissionListing::new(snapshot, filter))
    }

    pub fn status_summary(&self, actor: &Actor) -> Result<StatusSummary, ReviewError> {
        let listing = self.list_submissions(actor, SubmissionFilter::all())?;
        Ok(StatusSummary::tally(listing.iter()))
    }

    /// Status update from an untrusted string, e.g. a form value.
    pub fn update_status(
        &self,
        actor: &Actor,
        submission_id: &SubmissionId,
        new_status: &str,
    ) -> Result<ProposalSubmission, ReviewError> {
        require_admin(actor)?;
        let status = new_status.parse::<SubmissionStatus>()?;
        self.set_status(actor, submission_id, status)
    }

    /// Persist `status` on the submission; no other column is touched. Last write wins.
    pub fn set_status(
        &self,
        actor: &Actor,
        submission_id: &SubmissionId,
        status: SubmissionStatus,
    ) -> Result<ProposalSubmission, ReviewError> {
        require_admin(actor)?;

        let current = self
            .submissions
            .fetch(submission_id)
            .map_err(|err| persistence("fetch submission", err))?
            .ok_or(ReviewError::NotFound)?;

        if !self.policy.allows(current.status, status) {
            return Err(ReviewError::TransitionRejected {
                from: current.status,
                to: status,
            });
        }

        let updated = self
            .submissions
            .update_status(submission_id, status)
            .map_err(|err| persistence("update submission status", err))?;
        info!(
            submission_id = %submission_id.0,
            from = %current.status,
            to = %updated.status,
            admin = %actor.user_id.0,
            "submission status updated"
        );
        Ok(updated)
    }

    /// Renderer-ready proposal for the owner or an administrator.
    ///
    /// Other callers get `NotFound` whether or not the submission exists.
    pub fn proposal_document(
        &self,
        actor: &Actor,
        submission_id: &SubmissionId,
    ) -> Result<ProposalDocument, ReviewError> {
        let submission = self
            .submissions
            .fetch(submission_id)
            .map_err(|err| persistence("fetch submission", err))?
            .filter(|submission| actor.is_admin || submission.user_id == actor.user_id)
            .ok_or(ReviewError::NotFound)?;

        Ok(ProposalDocument::from_submission(&submission))
    }
}

fn require_admin(actor: &Actor) -> Result<(), ReviewError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(ReviewError::Unauthorized)
    }
}

fn persistence(operation: &'static str, err: RepositoryError) -> ReviewError {
    match err {
        RepositoryError::NotFound => ReviewError::NotFound,
        other => {
            warn!(operation, error = %other, "submission storage failed");
            ReviewError::Persistence(other)
        }
    }
}

/// Error raised by the review workflow.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("sign in to submit or view proposals")]
    NotAuthenticated,
    #[error("administrator access required")]
    Unauthorized,
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error(transparent)]
    InvalidInput(#[from] AmortizationError),
    #[error(transparent)]
    InvalidSignature(#[from] SignatureError),
    #[error("submission not found")]
    NotFound,
    #[error("cannot move submission from {from} to {to}")]
    TransitionRejected {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
    #[error("submission storage failed: {0}")]
    Persistence(RepositoryError),
}
