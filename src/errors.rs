use crate::models::FormField;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required.")]
    MissingField { fields: Vec<FormField> },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("VALIDATION_FAILED: {0}")]
    Validation(#[from] ValidationError),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("UNAUTHORIZED: {0}")]
    Unauthorized(String),
    #[error("PERSISTENCE_FAILURE: {0}")]
    Persistence(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
    #[error("INVALID_STATE: {0}")]
    InvalidState(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
