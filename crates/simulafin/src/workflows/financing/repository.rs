use super::identity::{UserId, UserProfile};

/// Failures reported by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the `users` table.
pub trait UserDirectory: Send + Sync {
    fn find(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
}
