use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{SimulationId, SimulationRecord, SimulationRequest};
use super::repository::SimulationRepository;
use crate::workflows::financing::amortization::{
    AmortizationError, FinancingSummary, SimulationInput, SimulationResult,
};
use crate::workflows::financing::identity::AuthenticatedUser;
use crate::workflows::financing::repository::RepositoryError;

/// Computes simulations and keeps the signed-in user's history.
pub struct SimulationService<S> {
    repository: Arc<S>,
}

static SIMULATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_simulation_id() -> SimulationId {
    let id = SIMULATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SimulationId(format!("sim-{id:06}"))
}

impl<S> SimulationService<S>
where
    S: SimulationRepository + 'static,
{
    pub fn new(repository: Arc<S>) -> Self {
        Self { repository }
    }

    /// Pure computation; nothing is stored.
    pub fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<(SimulationInput, SimulationResult), SimulationServiceError> {
        let input = request.to_input()?;
        let result = input.compute()?;
        Ok((input, result))
    }

    /// Compute and persist a simulation for `user`.
    pub fn record(
        &self,
        user: Option<&AuthenticatedUser>,
        request: &SimulationRequest,
    ) -> Result<SimulationRecord, SimulationServiceError> {
        let (input, result) = self.simulate(request)?;
        let user = user.ok_or(SimulationServiceError::NotAuthenticated)?;
        self.store(user, &input, &result)
    }

    /// Persist an already computed simulation.
    pub fn store(
        &self,
        user: &AuthenticatedUser,
        input: &SimulationInput,
        result: &SimulationResult,
    ) -> Result<SimulationRecord, SimulationServiceError> {
        let record = SimulationRecord {
            id: next_simulation_id(),
            user_id: user.id.clone(),
            user_email: user.email.clone(),
            financing: FinancingSummary::new(input, result),
            created_at: Utc::now(),
        };

        let stored = self
            .repository
            .insert(record)
            .map_err(|err| storage_failure("insert simulation", err))?;
        info!(simulation_id = %stored.id.0, user_id = %stored.user_id.0, "simulation saved");
        Ok(stored)
    }

    /// The caller's simulations, newest first.
    pub fn list_for(
        &self,
        user: Option<&AuthenticatedUser>,
    ) -> Result<Vec<SimulationRecord>, SimulationServiceError> {
        let user = user.ok_or(SimulationServiceError::NotAuthenticated)?;
        self.repository
            .list_for_user(&user.id)
            .map_err(|err| storage_failure("list simulations", err))
    }

    /// Remove one of the caller's own simulations.
    pub fn delete(
        &self,
        user: Option<&AuthenticatedUser>,
        simulation_id: &SimulationId,
    ) -> Result<(), SimulationServiceError> {
        let user = user.ok_or(SimulationServiceError::NotAuthenticated)?;
        let record = self
            .repository
            .fetch(simulation_id)
            .map_err(|err| storage_failure("fetch simulation", err))?
            .ok_or(SimulationServiceError::NotFound)?;

        if record.user_id != user.id {
            return Err(SimulationServiceError::Unauthorized);
        }

        self.repository
            .delete(simulation_id)
            .map_err(|err| storage_failure("delete simulation", err))?;
        info!(simulation_id = %simulation_id.0, "simulation deleted");
        Ok(())
    }
}

fn storage_failure(operation: &'static str, err: RepositoryError) -> SimulationServiceError {
    match err {
        RepositoryError::NotFound => SimulationServiceError::NotFound,
        other => {
            warn!(operation, error = %other, "simulation storage failed");
            SimulationServiceError::Persistence(other)
        }
    }
}

/// Error raised by the simulation service.
#[derive(Debug, thiserror::Error)]
pub enum SimulationServiceError {
    #[error(transparent)]
    InvalidInput(#[from] AmortizationError),
    #[error("sign in to manage saved simulations")]
    NotAuthenticated,
    #[error("simulation belongs to another user")]
    Unauthorized,
    #[error("simulation not found")]
    NotFound,
    #[error("simulation storage failed: {0}")]
    Persistence(RepositoryError),
}
