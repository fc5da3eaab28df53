use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::financing::amortization::FinancingSummary;
use crate::workflows::financing::identity::UserId;
use crate::workflows::financing::simulations::SimulationRequest;

/// Sequential id such as `sub-000042`.
///
/// Ordering follows issue order: a longer id was issued later, equal lengths compare by text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl Ord for SubmissionId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SubmissionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Administrative status of a submission. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Review,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Review,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Review => "review",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }

    /// Moves allowed by the forward-only lifecycle. Re-applying the current status is a no-op.
    pub fn can_advance_to(self, next: SubmissionStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            SubmissionStatus::Pending => next != SubmissionStatus::Pending,
            SubmissionStatus::Review => next.is_terminal(),
            SubmissionStatus::Approved | SubmissionStatus::Rejected => false,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A status string that is not part of the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown submission status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for SubmissionStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        SubmissionStatus::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// How strictly status updates follow the lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Administrators may set any status at any time; last write wins.
    #[default]
    Permissive,
    /// Pending -> Review -> {Approved, Rejected}, or Pending straight to a decision.
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn allows(self, from: SubmissionStatus, to: SubmissionStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::ForwardOnly => from.can_advance_to(to),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "forward_only" | "forward-only" => Ok(Self::ForwardOnly),
            other => Err(other.to_string()),
        }
    }
}

/// Signer details that fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signer name is required")]
    MissingName,
    #[error("national id must have 11 digits (found {digits})")]
    InvalidNationalId { digits: usize },
    #[error("a drawn signature is required")]
    MissingSignature,
}

/// Brazilian individual taxpayer number (CPF), stored as its 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Accepts formatted (`123.456.789-01`) or bare input.
    pub fn parse(raw: &str) -> Result<Self, SignatureError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 11 {
            return Err(SignatureError::InvalidNationalId {
                digits: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn formatted(&self) -> String {
        let digits = &self.0;
        format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        )
    }
}

impl TryFrom<String> for NationalId {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(value: NationalId) -> Self {
        value.0
    }
}

/// What the signature modal collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCapture {
    pub name: String,
    pub national_id: String,
    /// Encoded signature image (typically a PNG data URL).
    pub signature_image: String,
}

impl SignatureCapture {
    pub fn into_identity(self, signed_at: DateTime<Utc>) -> Result<SignerIdentity, SignatureError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SignatureError::MissingName);
        }
        let national_id = NationalId::parse(&self.national_id)?;
        if self.signature_image.trim().is_empty() {
            return Err(SignatureError::MissingSignature);
        }

        Ok(SignerIdentity {
            user_name: name.to_string(),
            user_cpf: national_id,
            signature_data: self.signature_image,
            signed_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignerIdentity {
    pub user_name: String,
    pub user_cpf: NationalId,
    pub signature_data: String,
    pub signed_at: DateTime<Utc>,
}

/// Accepted simulation plus the signature that turns it into a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub simulation: SimulationRequest,
    pub signature: SignatureCapture,
}

/// Row of the `financing_submissions` table. Only `status` changes after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSubmission {
    pub id: SubmissionId,
    pub user_id: UserId,
    pub user_email: String,
    #[serde(flatten)]
    pub signer: SignerIdentity,
    #[serde(flatten)]
    pub financing: FinancingSummary,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub review: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusSummary {
    pub fn tally<'a>(submissions: impl IntoIterator<Item = &'a ProposalSubmission>) -> Self {
        submissions
            .into_iter()
            .fold(Self::default(), |mut summary, submission| {
                summary.total += 1;
                match submission.status {
                    SubmissionStatus::Pending => summary.pending += 1,
                    SubmissionStatus::Review => summary.review += 1,
                    SubmissionStatus::Approved => summary.approved += 1,
                    SubmissionStatus::Rejected => summary.rejected += 1,
                }
                summary
            })
    }
}
