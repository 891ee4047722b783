//! ReportProjection entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::agreement::Occurrence;
use crate::domain::foundation::{OccurrenceId, ReportId, Timestamp, ValidationError};

/// Per-occurrence tracking record.
///
/// Created together with its occurrence and mirroring its window. Weight
/// and report time stay empty until the pickup is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProjection {
    id: ReportId,
    occurrence_id: OccurrenceId,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    weight_kg: Option<f64>,
    reported_at: Option<Timestamp>,
}

impl ReportProjection {
    /// The empty projection for a freshly inserted occurrence.
    pub fn for_occurrence(occurrence: &Occurrence) -> Self {
        Self {
            id: ReportId::new(),
            occurrence_id: *occurrence.id(),
            starts_at: occurrence.starts_at(),
            ends_at: occurrence.ends_at(),
            weight_kg: None,
            reported_at: None,
        }
    }

    /// Reconstitute a projection from persistence (no validation).
    pub fn reconstitute(
        id: ReportId,
        occurrence_id: OccurrenceId,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        weight_kg: Option<f64>,
        reported_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            occurrence_id,
            starts_at,
            ends_at,
            weight_kg,
            reported_at,
        }
    }

    pub fn id(&self) -> &ReportId {
        &self.id
    }

    pub fn occurrence_id(&self) -> &OccurrenceId {
        &self.occurrence_id
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    pub fn reported_at(&self) -> Option<&Timestamp> {
        self.reported_at.as_ref()
    }

    pub fn is_reported(&self) -> bool {
        self.reported_at.is_some()
    }

    /// Records the measured weight.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` for negative or non-finite weights
    pub fn record_weight(&mut self, weight_kg: f64, at: Timestamp) -> Result<(), ValidationError> {
        if !weight_kg.is_finite() || weight_kg < 0.0 {
            return Err(ValidationError::invalid_format(
                "weight_kg",
                format!("must be a non-negative number, got {}", weight_kg),
            ));
        }
        self.weight_kg = Some(weight_kg);
        self.reported_at = Some(at);
        Ok(())
    }
}
