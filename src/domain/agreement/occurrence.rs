//! Occurrence entity: one concrete, dated pickup of a schedule.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OccurrenceId, ScheduleId, Timestamp};
use crate::domain::recurrence::OccurrenceWindow;

/// Occurrence entity (child of Schedule).
///
/// Occurrences are cancelled, never deleted: a report projection may
/// reference them after their schedule is archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    id: OccurrenceId,
    schedule_id: ScheduleId,
    starts_at: NaiveDateTime,
    ends_at: NaiveDateTime,
    note: Option<String>,
    cancelled_at: Option<Timestamp>,
    created_at: Timestamp,
}

impl Occurrence {
    /// A fresh occurrence for one expanded window.
    pub fn from_window(schedule_id: ScheduleId, window: OccurrenceWindow) -> Self {
        Self {
            id: OccurrenceId::new(),
            schedule_id,
            starts_at: window.starts_at,
            ends_at: window.ends_at,
            note: None,
            cancelled_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute an occurrence from persistence (no validation).
    pub fn reconstitute(
        id: OccurrenceId,
        schedule_id: ScheduleId,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
        note: Option<String>,
        cancelled_at: Option<Timestamp>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            schedule_id,
            starts_at,
            ends_at,
            note,
            cancelled_at,
            created_at,
        }
    }

    pub fn id(&self) -> &OccurrenceId {
        &self.id
    }

    pub fn schedule_id(&self) -> &ScheduleId {
        &self.schedule_id
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.ends_at
    }

    pub fn window(&self) -> OccurrenceWindow {
        OccurrenceWindow {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn cancelled_at(&self) -> Option<&Timestamp> {
        self.cancelled_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some()
    }

    /// Sets the cancellation timestamp.
    ///
    /// Returns false (and keeps the original timestamp) if already cancelled.
    pub fn cancel(&mut self, at: Timestamp) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.cancelled_at = Some(at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> OccurrenceWindow {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        OccurrenceWindow::new(
            day.and_hms_opt(10, 0, 0).unwrap(),
            day.and_hms_opt(11, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn from_window_copies_the_window() {
        let occurrence = Occurrence::from_window(ScheduleId::new(), window());
        assert_eq!(occurrence.window(), window());
        assert!(!occurrence.is_cancelled());
    }

    #[test]
    fn cancel_keeps_the_first_timestamp() {
        let mut occurrence = Occurrence::from_window(ScheduleId::new(), window());
        let first = Timestamp::now();
        assert!(occurrence.cancel(first));
        assert!(!occurrence.cancel(Timestamp::now()));
        assert_eq!(occurrence.cancelled_at(), Some(&first));
    }
}
