//! Multi-entity writes shared by the handlers.
//!
//! Everything here runs on a caller-owned transaction; the caller decides
//! whether to commit. [`finish`] is that decision.

use tracing::{debug, warn};

use crate::domain::agreement::{Occurrence, Schedule, ScheduleGraph};
use crate::domain::foundation::{ScheduleId, Timestamp};
use crate::domain::recurrence::OccurrenceWindow;
use crate::domain::report::ReportProjection;
use crate::ports::{OccurrenceFilter, RepositoryError, Transaction};

use super::ServiceError;

/// Inserts a schedule, its occurrences, and one report projection per
/// occurrence.
pub(crate) async fn persist_schedule(
    tx: &mut dyn Transaction,
    schedule: Schedule,
    windows: Vec<OccurrenceWindow>,
) -> Result<ScheduleGraph, RepositoryError> {
    tx.schedules().insert(&schedule).await?;

    let occurrences: Vec<Occurrence> = windows
        .into_iter()
        .map(|window| Occurrence::from_window(*schedule.id(), window))
        .collect();
    tx.occurrences().insert_many(&occurrences).await?;

    let mut reports = tx.reports();
    for occurrence in &occurrences {
        reports
            .insert(&ReportProjection::for_occurrence(occurrence))
            .await?;
    }
    drop(reports);

    debug!(
        schedule_id = %schedule.id(),
        occurrences = occurrences.len(),
        "Schedule persisted"
    );
    Ok(ScheduleGraph {
        schedule,
        occurrences,
    })
}

/// What an archive cascade changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub schedules_archived: usize,
    pub occurrences_cancelled: usize,
}

impl ArchiveSummary {
    pub(crate) fn absorb(&mut self, other: ArchiveSummary) {
        self.schedules_archived += other.schedules_archived;
        self.occurrences_cancelled += other.occurrences_cancelled;
    }
}

/// Archives a schedule and cancels its live occurrences.
///
/// Already archived schedules and already cancelled occurrences are left
/// alone, so repeating the cascade is a no-op.
pub(crate) async fn archive_schedule(
    tx: &mut dyn Transaction,
    schedule_id: &ScheduleId,
    at: Timestamp,
) -> Result<(Schedule, ArchiveSummary), RepositoryError> {
    let mut schedule = tx.schedules().find_one(schedule_id).await?;
    let mut summary = ArchiveSummary::default();

    if schedule.archive(at) {
        tx.schedules().archive(schedule_id, at).await?;
        summary.schedules_archived = 1;
    }

    let live = tx
        .occurrences()
        .find(
            &OccurrenceFilter::new()
                .with_schedule(*schedule_id)
                .with_cancelled(false),
        )
        .await?;

    let mut occurrences = tx.occurrences();
    for occurrence in &live {
        occurrences.archive(occurrence.id(), at).await?;
    }
    summary.occurrences_cancelled = live.len();

    Ok((schedule, summary))
}

/// Commits on success; rolls back on failure and returns the original error.
pub(crate) async fn finish<T>(
    tx: Box<dyn Transaction>,
    result: Result<T, ServiceError>,
    operation: &'static str,
    correlation_id: &str,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(
                    operation,
                    correlation_id,
                    error = %rollback_err,
                    "Rollback failed; dropping transaction"
                );
            }
            warn!(operation, correlation_id, error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}
