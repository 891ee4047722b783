//! Schedule entity.
//!
//! A schedule is one recurring pickup definition under an agreement: a
//! time-of-day window, a validity window of dates, and an optional
//! recurrence rule. Its first occurrence falls on `valid_from`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::aggregate::validate_date_window;
use crate::domain::foundation::{
    AgreementId, LocationId, RecordStatus, ScheduleId, Timestamp, ValidationError,
};
use crate::domain::recurrence::{OccurrenceWindow, RecurrenceRule, ScheduleExpander};

/// Attributes supplied when creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefinition {
    pub location_id: LocationId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

/// Partial update of a schedule row. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleChanges {
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ScheduleChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Schedule entity (child of Agreement).
///
/// # Invariants
///
/// - `start_time < end_time` (pickups never span midnight)
/// - `valid_from <= valid_until`
/// - a date-terminated rule does not end before `valid_from`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    id: ScheduleId,
    agreement_id: AgreementId,
    location_id: LocationId,
    start_time: NaiveTime,
    end_time: NaiveTime,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    note: Option<String>,
    recurrence: Option<RecurrenceRule>,
    status: RecordStatus,
    archived_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Schedule {
    /// Create a new active schedule.
    ///
    /// # Errors
    ///
    /// - `InvalidWindow` if the time or date window is empty, or the
    ///   recurrence ends before the schedule starts
    pub fn new(
        id: ScheduleId,
        agreement_id: AgreementId,
        definition: ScheduleDefinition,
    ) -> Result<Self, ValidationError> {
        validate_time_window(definition.start_time, definition.end_time)?;
        validate_date_window("schedule", definition.valid_from, definition.valid_until)?;
        if let Some(until) = definition
            .recurrence
            .as_ref()
            .and_then(RecurrenceRule::termination_date)
        {
            if until < definition.valid_from {
                return Err(ValidationError::invalid_window(
                    "recurrence",
                    format!(
                        "termination date {} is before valid_from {}",
                        until, definition.valid_from
                    ),
                ));
            }
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            agreement_id,
            location_id: definition.location_id,
            start_time: definition.start_time,
            end_time: definition.end_time,
            valid_from: definition.valid_from,
            valid_until: definition.valid_until,
            note: definition.note,
            recurrence: definition.recurrence,
            status: RecordStatus::Active,
            archived_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a schedule from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ScheduleId,
        agreement_id: AgreementId,
        location_id: LocationId,
        start_time: NaiveTime,
        end_time: NaiveTime,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        note: Option<String>,
        recurrence: Option<RecurrenceRule>,
        status: RecordStatus,
        archived_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            agreement_id,
            location_id,
            start_time,
            end_time,
            valid_from,
            valid_until,
            note,
            recurrence,
            status,
            archived_at,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ScheduleId {
        &self.id
    }

    pub fn agreement_id(&self) -> &AgreementId {
        &self.agreement_id
    }

    pub fn location_id(&self) -> &LocationId {
        &self.location_id
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
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

    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        self.recurrence.as_ref()
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

    pub fn is_archived(&self) -> bool {
        !self.status.is_mutable()
    }

    /// The window of the first pickup: `valid_from` at the configured times.
    pub fn first_window(&self) -> OccurrenceWindow {
        OccurrenceWindow {
            starts_at: self.valid_from.and_time(self.start_time),
            ends_at: self.valid_from.and_time(self.end_time),
        }
    }

    /// Expander for this schedule's occurrences.
    pub fn expander(&self) -> ScheduleExpander {
        ScheduleExpander::new(self.first_window(), self.recurrence)
    }

    /// Every occurrence window inside the validity window.
    ///
    /// # Errors
    ///
    /// - `ExpansionLimitExceeded` if more than `limit` windows are produced
    pub fn occurrence_windows(&self, limit: usize) -> Result<Vec<OccurrenceWindow>, ValidationError> {
        self.expander().materialize(Some(self.valid_until), limit)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a partial update to the schedule row.
    ///
    /// Already generated occurrences are not regenerated.
    ///
    /// # Errors
    ///
    /// - `InvalidWindow` if the resulting windows are empty
    pub fn apply(&mut self, changes: ScheduleChanges, at: Timestamp) -> Result<(), ValidationError> {
        let start_time = changes.start_time.unwrap_or(self.start_time);
        let end_time = changes.end_time.unwrap_or(self.end_time);
        let valid_from = changes.valid_from.unwrap_or(self.valid_from);
        let valid_until = changes.valid_until.unwrap_or(self.valid_until);
        validate_time_window(start_time, end_time)?;
        validate_date_window("schedule", valid_from, valid_until)?;

        self.start_time = start_time;
        self.end_time = end_time;
        self.valid_from = valid_from;
        self.valid_until = valid_until;
        if let Some(note) = changes.note {
            self.note = Some(note);
        }
        self.updated_at = at;
        Ok(())
    }

    /// Marks the schedule archived.
    ///
    /// Returns false (and keeps the original timestamp) if it already was.
    pub fn archive(&mut self, at: Timestamp) -> bool {
        if self.is_archived() {
            return false;
        }
        self.status = RecordStatus::Archived;
        self.archived_at = Some(at);
        self.updated_at = at;
        true
    }
}

fn validate_time_window(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::invalid_window(
            "schedule",
            format!("end_time {} is not after start_time {}", end, start),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recurrence::{RecurrenceRuleParams, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn definition(recurrence: Option<RecurrenceRule>) -> ScheduleDefinition {
        ScheduleDefinition {
            location_id: LocationId::new(),
            start_time: time(10),
            end_time: time(11),
            valid_from: date(2024, 3, 4),
            valid_until: date(2024, 6, 30),
            note: None,
            recurrence,
        }
    }

    #[test]
    fn first_window_uses_valid_from_and_times() {
        let schedule = Schedule::new(ScheduleId::new(), AgreementId::new(), definition(None)).unwrap();
        let window = schedule.first_window();
        assert_eq!(window.starts_at, date(2024, 3, 4).and_time(time(10)));
        assert_eq!(window.ends_at, date(2024, 3, 4).and_time(time(11)));
    }

    #[test]
    fn rejects_end_time_not_after_start() {
        let result = Schedule::new(
            ScheduleId::new(),
            AgreementId::new(),
            ScheduleDefinition {
                end_time: time(10),
                ..definition(None)
            },
        );
        assert!(matches!(result, Err(ValidationError::InvalidWindow { .. })));
    }

    #[test]
    fn rejects_rule_ending_before_schedule_starts() {
        let rule = RecurrenceRule::try_from(RecurrenceRuleParams {
            interval: 1,
            weekdays: Some(vec![Weekday::Monday]),
            termination_count: None,
            termination_date: Some(date(2024, 3, 1)),
        })
        .unwrap();
        let result = Schedule::new(ScheduleId::new(), AgreementId::new(), definition(Some(rule)));
        assert!(matches!(result, Err(ValidationError::InvalidWindow { .. })));
    }

    #[test]
    fn occurrence_windows_stay_inside_validity_window() {
        let rule = RecurrenceRule::weekly(1, 100).unwrap();
        let schedule =
            Schedule::new(ScheduleId::new(), AgreementId::new(), definition(Some(rule))).unwrap();

        let windows = schedule.occurrence_windows(1000).unwrap();
        assert_eq!(windows.first().map(|w| w.starts_at.date()), Some(date(2024, 3, 4)));
        assert!(windows.iter().all(|w| w.ends_at.date() <= date(2024, 6, 30)));
        // Mondays from 2024-03-04 through 2024-06-24.
        assert_eq!(windows.len(), 17);
    }

    #[test]
    fn apply_updates_only_given_fields() {
        let mut schedule =
            Schedule::new(ScheduleId::new(), AgreementId::new(), definition(None)).unwrap();
        schedule
            .apply(
                ScheduleChanges {
                    end_time: Some(time(12)),
                    note: Some("Ring twice".to_string()),
                    ..Default::default()
                },
                Timestamp::now(),
            )
            .unwrap();

        assert_eq!(schedule.start_time(), time(10));
        assert_eq!(schedule.end_time(), time(12));
        assert_eq!(schedule.note(), Some("Ring twice"));
    }

    #[test]
    fn apply_rejects_invalid_result_and_leaves_schedule_untouched() {
        let mut schedule =
            Schedule::new(ScheduleId::new(), AgreementId::new(), definition(None)).unwrap();
        let before = schedule.clone();
        let result = schedule.apply(
            ScheduleChanges {
                start_time: Some(time(12)),
                ..Default::default()
            },
            Timestamp::now(),
        );
        assert!(result.is_err());
        assert_eq!(schedule, before);
    }

    #[test]
    fn archive_reports_whether_state_changed() {
        let mut schedule =
            Schedule::new(ScheduleId::new(), AgreementId::new(), definition(None)).unwrap();
        assert!(schedule.archive(Timestamp::now()));
        assert!(schedule.is_archived());
        assert!(!schedule.archive(Timestamp::now()));
    }
}
