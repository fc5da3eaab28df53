//! Property-financing simulation under the constant-amortization system (SAC) and the
//! administrative review workflow for signed financing proposals.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
