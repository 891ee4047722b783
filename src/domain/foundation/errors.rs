//! Error types for the domain layer.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Errors raised while validating commands, rules and windows.
///
/// Always raised before any persistence happens; never partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Recurrence interval must be at least 1, got {actual}")]
    InvalidInterval { actual: i64 },

    #[error("Recurrence rule needs a termination count or a termination date")]
    MissingTermination,

    #[error("Recurrence rule cannot set both a termination count and a termination date")]
    ConflictingTermination,

    #[error("Recurrence termination count must be at least 1, got {actual}")]
    InvalidTerminationCount { actual: i64 },

    #[error("Invalid window for '{field}': {reason}")]
    InvalidWindow { field: String, reason: String },

    #[error("Schedule window {from}..={until} lies outside its agreement's validity window")]
    OutsideAgreement { from: NaiveDate, until: NaiveDate },

    #[error("Schedule expands to more than {limit} occurrences")]
    ExpansionLimitExceeded { limit: usize },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid window validation error.
    pub fn invalid_window(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidWindow {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes surfaced to the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    NotFound,
    InvalidStateTransition,
    DatabaseError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_correctly() {
        let err = ValidationError::empty_field("note");
        assert_eq!(format!("{}", err), "Field 'note' cannot be empty");
    }

    #[test]
    fn out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("interval", 1, 52, 0);
        assert_eq!(
            format!("{}", err),
            "Field 'interval' must be between 1 and 52, got 0"
        );
    }

    #[test]
    fn conflicting_termination_displays_correctly() {
        assert_eq!(
            ValidationError::ConflictingTermination.to_string(),
            "Recurrence rule cannot set both a termination count and a termination date"
        );
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::ValidationFailed), "VALIDATION_FAILED");
        assert_eq!(format!("{}", ErrorCode::DatabaseError), "DATABASE_ERROR");
    }
}
