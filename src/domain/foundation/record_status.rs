//! RecordStatus enum for the soft-delete lifecycle of agreements and schedules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an archivable record.
///
/// Archived rows are never physically removed: report projections keep
/// non-owning references to their occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Archived,
}

impl RecordStatus {
    /// Returns true if the record can be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Archived => "archived",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(RecordStatus::Active),
            "archived" => Some(RecordStatus::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordStatus::Active => "Active",
            RecordStatus::Archived => "Archived",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(RecordStatus::default(), RecordStatus::Active);
    }

    #[test]
    fn only_active_is_mutable() {
        assert!(RecordStatus::Active.is_mutable());
        assert!(!RecordStatus::Archived.is_mutable());
    }

    #[test]
    fn storage_representation_parses_back() {
        for status in [RecordStatus::Active, RecordStatus::Archived] {
            assert_eq!(RecordStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RecordStatus::parse("deleted"), None);
    }
}
