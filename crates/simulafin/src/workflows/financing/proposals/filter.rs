use std::str::FromStr;

use super::domain::{ProposalSubmission, SubmissionStatus, UnknownStatus};

/// Status selector of the admin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SubmissionStatus),
}

impl StatusFilter {
    pub fn matches(self, status: SubmissionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed.parse().map(StatusFilter::Only)
    }
}

/// Search box plus status selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    search_term: Option<String>,
    status: StatusFilter,
}

impl SubmissionFilter {
    pub fn new(search_term: Option<&str>, status: StatusFilter) -> Self {
        let search_term = search_term
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());
        Self {
            search_term,
            status,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    /// Case-insensitive substring match on signer name, e-mail, national id and property value.
    pub fn matches(&self, submission: &ProposalSubmission) -> bool {
        if !self.status.matches(submission.status) {
            return false;
        }

        let Some(term) = self.search_term.as_deref() else {
            return true;
        };

        [
            submission.signer.user_name.as_str(),
            submission.user_email.as_str(),
            submission.signer.user_cpf.as_str(),
            submission.financing.property_value.as_str(),
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(term))
    }
}

/// Snapshot of the submissions table with a filter applied lazily.
///
/// The snapshot is taken once; iterating again replays the same elements in the same order.
#[derive(Debug, Clone)]
pub struct SubmissionListing {
    snapshot: Vec<ProposalSubmission>,
    filter: SubmissionFilter,
}

impl SubmissionListing {
    pub fn new(snapshot: Vec<ProposalSubmission>, filter: SubmissionFilter) -> Self {
        Self { snapshot, filter }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProposalSubmission> + '_ {
        self.snapshot
            .iter()
            .filter(move |submission| self.filter.matches(submission))
    }

    /// Size of the unfiltered snapshot.
    pub fn total(&self) -> usize {
        self.snapshot.len()
    }

    pub fn matched(&self) -> usize {
        self.iter().count()
    }

    pub fn filter(&self) -> &SubmissionFilter {
        &self.filter
    }

    pub fn into_matches(self) -> Vec<ProposalSubmission> {
        let Self { snapshot, filter } = self;
        snapshot
            .into_iter()
            .filter(|submission| filter.matches(submission))
            .collect()
    }
}

impl<'a> IntoIterator for &'a SubmissionListing {
    type Item = &'a ProposalSubmission;
    type IntoIter = Box<dyn Iterator<Item = &'a ProposalSubmission> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
