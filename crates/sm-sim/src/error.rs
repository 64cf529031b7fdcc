//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or playing back a trajectory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Rejected physical parameter, initial condition or option.
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: String },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        SimError::InvalidParameter { what: what.into() }
    }
}

impl From<sm_core::SmError> for SimError {
    fn from(e: sm_core::SmError) -> Self {
        match e {
            sm_core::SmError::NonFinite { what, value } => SimError::NonFinite { what, value },
            sm_core::SmError::InvalidArg { what } => SimError::InvalidParameter {
                what: what.to_string(),
            },
        }
    }
}
