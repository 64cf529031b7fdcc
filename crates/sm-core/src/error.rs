use thiserror::Error;

pub type SmResult<T> = Result<T, SmError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SmError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}
