use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::financing::amortization::{
    AmortizationError, FinancingSummary, SimulationInput,
};
use crate::workflows::financing::identity::UserId;

/// Sequential id such as `sim-000042`.
///
/// Ordering follows issue order: a longer id was issued later, equal lengths compare by text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(pub String);

impl Ord for SimulationId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SimulationId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Form payload for a simulation. The property value is the display string typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub property_value: String,
    pub down_payment_percentage: f64,
    pub term_years: u32,
}

impl SimulationRequest {
    pub fn to_input(&self) -> Result<SimulationInput, AmortizationError> {
        SimulationInput::parse(
            &self.property_value,
            self.down_payment_percentage,
            self.term_years,
        )
    }
}

/// Row of the `simulations` table. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: SimulationId,
    pub user_id: UserId,
    pub user_email: String,
    #[serde(flatten)]
    pub financing: FinancingSummary,
    pub created_at: DateTime<Utc>,
}
