//! Error types for the sm-app service layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application error shared by the CLI and any other front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected request. The message is user-facing.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    /// The remote backend could not be reached.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for sm-app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Parameter rejections stay client errors; anything else is server-side.
impl From<sm_sim::SimError> for AppError {
    fn from(err: sm_sim::SimError) -> Self {
        match err {
            sm_sim::SimError::InvalidParameter { what } => {
                AppError::InvalidInput(format!("Parámetro no válido: {what}"))
            }
            other => AppError::Simulation(other.to_string()),
        }
    }
}

impl AppError {
    /// Whether the caller sent a bad request, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable { .. })
    }

    /// Wire body for this error.
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            AppError::InvalidInput(message) => message.clone(),
            other => format!("Error interno del servidor: {other}"),
        };
        ErrorResponse { error }
    }
}

/// `{"error": "..."}` body returned for failed requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_is_passed_through() {
        let err = AppError::InvalidInput("La masa debe ser positiva".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.to_response().error, "La masa debe ser positiva");
    }

    #[test]
    fn rejected_parameters_are_client_errors() {
        let err: AppError = sm_sim::SimError::InvalidParameter {
            what: "stop time must be after start time".to_string(),
        }
        .into();
        assert!(err.is_client_error());
        assert_eq!(
            err.to_response().error,
            "Parámetro no válido: stop time must be after start time"
        );
    }

    #[test]
    fn simulation_errors_are_server_side() {
        let err: AppError = sm_sim::SimError::Invariant { what: "x" }.into();
        assert!(!err.is_client_error());
        assert!(err.to_response().error.starts_with("Error interno del servidor"));
    }
}
