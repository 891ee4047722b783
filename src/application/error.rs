//! Error surfaced by every command and query handler.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::RepositoryError;

/// Coordinator-level error.
///
/// Validation failures happen before any transaction opens. Repository
/// failures abort the transaction and are carried here unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ServiceError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        ServiceError::InvalidState(reason.into())
    }

    /// Error code for the API layer.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(_) => ErrorCode::ValidationFailed,
            ServiceError::Repository(err) if err.is_not_found() => ErrorCode::NotFound,
            ServiceError::Repository(_) => ErrorCode::DatabaseError,
            ServiceError::InvalidState(_) => ErrorCode::InvalidStateTransition,
        }
    }
}
