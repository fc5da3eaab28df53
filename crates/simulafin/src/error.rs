use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::financing::amortization::AmortizationError;
use crate::workflows::financing::proposals::ReviewError;
use crate::workflows::financing::simulations::SimulationServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Simulation(AmortizationError),
    SimulationStorage(SimulationServiceError),
    Review(ReviewError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Simulation(err) => write!(f, "simulation error: {}", err),
            AppError::SimulationStorage(err) => write!(f, "simulation error: {}", err),
            AppError::Review(err) => write!(f, "proposal review error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Simulation(err) => Some(err),
            AppError::SimulationStorage(err) => Some(err),
            AppError::Review(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Simulation(_)
            | AppError::SimulationStorage(SimulationServiceError::InvalidInput(_))
            | AppError::Review(ReviewError::InvalidInput(_) | ReviewError::InvalidSignature(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Review(ReviewError::Unauthorized) => StatusCode::FORBIDDEN,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::SimulationStorage(_)
            | AppError::Review(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<AmortizationError> for AppError {
    fn from(value: AmortizationError) -> Self {
        Self::Simulation(value)
    }
}

impl From<SimulationServiceError> for AppError {
    fn from(value: SimulationServiceError) -> Self {
        Self::SimulationStorage(value)
    }
}

impl From<ReviewError> for AppError {
    fn from(value: ReviewError) -> Self {
        Self::Review(value)
    }
}
