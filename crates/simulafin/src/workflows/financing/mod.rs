//! Financing simulation and proposal lifecycle.
//!
//! `amortization` is the pure SAC engine. `simulations` persists computed schedules for their
//! owner, `proposals` turns a signed simulation into a submission and drives its administrative
//! review. Both workflows receive the caller identity explicitly through `identity`.

pub mod amortization;
pub mod identity;
pub mod money;
pub mod proposals;
pub mod repository;
pub mod simulations;

pub use amortization::{
    compute_sac, AmortizationError, AmortizationSchedule, FinancingSummary, Installment,
    SimulationInput, SimulationResult, ANNUAL_RATE,
};
pub use identity::{current_user, Actor, AuthenticatedUser, UserId, UserProfile};
pub use money::{format_brl, format_brl_whole, parse_currency};
pub use repository::{RepositoryError, UserDirectory};
