use super::domain::{SimulationId, SimulationRecord};
use crate::workflows::financing::identity::UserId;
use crate::workflows::financing::repository::RepositoryError;

/// Storage contract for the `simulations` table.
pub trait SimulationRepository: Send + Sync {
    fn insert(&self, record: SimulationRecord) -> Result<SimulationRecord, RepositoryError>;
    fn fetch(&self, id: &SimulationId) -> Result<Option<SimulationRecord>, RepositoryError>;
    /// Simulations owned by `user_id`, newest first.
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<SimulationRecord>, RepositoryError>;
    fn delete(&self, id: &SimulationId) -> Result<(), RepositoryError>;
}
