//! Agreement aggregate.
//!
//! An agreement binds an organization to a pickup location for a validity
//! window and owns the schedules that generate pickups there.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AgreementId, LocationId, OrganizationId, RecordStatus, Timestamp, ValidationError,
};

/// Attributes supplied when creating an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementTerms {
    pub organization_id: OrganizationId,
    pub location_id: LocationId,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

/// Agreement aggregate root.
///
/// # Invariants
///
/// - `valid_from <= valid_until`
/// - `archived_at` is set exactly when `status` is `Archived`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    id: AgreementId,
    organization_id: OrganizationId,
    location_id: LocationId,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    note: Option<String>,
    status: RecordStatus,
    archived_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Agreement {
    /// Create a new active agreement.
    ///
    /// # Errors
    ///
    /// - `InvalidWindow` if the validity window ends before it starts
    pub fn new(id: AgreementId, terms: AgreementTerms) -> Result<Self, ValidationError> {
        validate_date_window("agreement", terms.valid_from, terms.valid_until)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            organization_id: terms.organization_id,
            location_id: terms.location_id,
            valid_from: terms.valid_from,
            valid_until: terms.valid_until,
            note: terms.note,
            status: RecordStatus::Active,
            archived_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute an agreement from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AgreementId,
        organization_id: OrganizationId,
        location_id: LocationId,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        note: Option<String>,
        status: RecordStatus,
        archived_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            organization_id,
            location_id,
            valid_from,
            valid_until,
            note,
            status,
            archived_at,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &AgreementId {
        &self.id
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    pub fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn archived_at(&self) -> Option<&Timestamp> {
        self.archived_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true if `from..=until` lies inside this agreement's validity window.
    pub fn covers(&self, from: NaiveDate, until: NaiveDate) -> bool {
        self.valid_from <= from && until <= self.valid_until
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Marks the agreement archived.
    ///
    /// Returns false (and keeps the original timestamp) if it already was.
    pub fn archive(&mut self, at: Timestamp) -> bool {
        if !self.status.is_mutable() {
            return false;
        }
        self.status = RecordStatus::Archived;
        self.archived_at = Some(at);
        self.updated_at = at;
        true
    }
}

/// Checks that a date window is non-empty.
pub(crate) fn validate_date_window(
    field: &str,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<(), ValidationError> {
    if until < from {
        return Err(ValidationError::invalid_window(
            field,
            format!("valid_until {} is before valid_from {}", until, from),
        ));
    }
    Ok(())
}
