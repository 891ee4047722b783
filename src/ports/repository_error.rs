//! Errors returned by every repository port.

use thiserror::Error;

/// Storage-layer failure.
///
/// Adapters map their driver errors into one of these variants; handlers
/// propagate them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Failed to insert {entity}: {reason}")]
    Insert { entity: &'static str, reason: String },

    #[error("Failed to update {entity}: {reason}")]
    Update { entity: &'static str, reason: String },

    #[error("Failed to query {entity}: {reason}")]
    Select { entity: &'static str, reason: String },

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Stored {entity} could not be read back: {reason}")]
    Corrupt { entity: &'static str, reason: String },
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn insert(entity: &'static str, reason: impl ToString) -> Self {
        RepositoryError::Insert {
            entity,
            reason: reason.to_string(),
        }
    }

    pub fn update(entity: &'static str, reason: impl ToString) -> Self {
        RepositoryError::Update {
            entity,
            reason: reason.to_string(),
        }
    }

    pub fn select(entity: &'static str, reason: impl ToString) -> Self {
        RepositoryError::Select {
            entity,
            reason: reason.to_string(),
        }
    }

    pub fn corrupt(entity: &'static str, reason: impl ToString) -> Self {
        RepositoryError::Corrupt {
            entity,
            reason: reason.to_string(),
        }
    }

    pub fn transaction(reason: impl ToString) -> Self {
        RepositoryError::Transaction(reason.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_entity_and_id() {
        let err = RepositoryError::not_found("schedule", "abc");
        assert_eq!(err.to_string(), "schedule not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn insert_is_not_a_not_found() {
        let err = RepositoryError::insert("occurrence", "unique violation");
        assert_eq!(err.to_string(), "Failed to insert occurrence: unique violation");
        assert!(!err.is_not_found());
    }
}
