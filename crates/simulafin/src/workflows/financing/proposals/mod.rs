//! Signed financing proposals and their administrative review.

pub mod document;
pub mod domain;
pub mod filter;
pub mod repository;
pub mod review;
pub mod router;

#[cfg(test)]
mod tests;

pub use document::ProposalDocument;
pub use domain::{
    NationalId, ProposalDraft, ProposalSubmission, SignatureCapture, SignatureError,
    SignerIdentity, StatusSummary, SubmissionId, SubmissionStatus, TransitionPolicy,
    UnknownStatus,
};
pub use filter::{StatusFilter, SubmissionFilter, SubmissionListing};
pub use repository::SubmissionRepository;
pub use review::{AdminReviewWorkflow, ReviewError};
pub use router::submission_router;
