use super::domain::{ProposalSubmission, SubmissionId, SubmissionStatus};
use crate::workflows::financing::identity::UserId;
use crate::workflows::financing::repository::RepositoryError;

/// Storage contract for the `financing_submissions` table.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, submission: ProposalSubmission)
        -> Result<ProposalSubmission, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<ProposalSubmission>, RepositoryError>;
    /// Every submission, newest first.
    fn list(&self) -> Result<Vec<ProposalSubmission>, RepositoryError>;
    /// Submissions owned by `user_id`, newest first.
    fn list_for_user(&self, user_id: &UserId)
        -> Result<Vec<ProposalSubmission>, RepositoryError>;
    /// Patch the status column only and return the stored row.
    fn update_status(
        &self,
        id: &SubmissionId,
        status: SubmissionStatus,
    ) -> Result<ProposalSubmission, RepositoryError>;
}
