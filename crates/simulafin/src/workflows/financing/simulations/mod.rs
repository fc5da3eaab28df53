//! Saved simulations: one computed SAC summary per row, owned by the user who ran it.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{SimulationId, SimulationRecord, SimulationRequest};
pub use repository::SimulationRepository;
pub use router::simulation_router;
pub use service::{SimulationService, SimulationServiceError};
