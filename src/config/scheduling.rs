//! Schedule expansion settings

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound accepted for `max_occurrences_per_schedule`.
pub const OCCURRENCE_CAP_CEILING: usize = 5000;

/// Bounds applied when a schedule is expanded into occurrences.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulingConfig {
    /// Expanding past this many occurrences fails the create command
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences_per_schedule: usize,
}

impl SchedulingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=OCCURRENCE_CAP_CEILING).contains(&self.max_occurrences_per_schedule) {
            return Err(ValidationError::InvalidOccurrenceCap {
                max: OCCURRENCE_CAP_CEILING,
                actual: self.max_occurrences_per_schedule,
            });
        }
        Ok(())
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            max_occurrences_per_schedule: default_max_occurrences(),
        }
    }
}

fn default_max_occurrences() -> usize {
    1000
}
