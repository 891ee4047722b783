//! ArchiveScheduleHandler - soft-deletes a schedule and cancels its
//! occurrences in one transaction.

use std::sync::Arc;

use tracing::info;

use crate::application::cascade::{self, ArchiveSummary};
use crate::application::ServiceError;
use crate::domain::agreement::Schedule;
use crate::domain::foundation::{CommandMetadata, ScheduleId, Timestamp};
use crate::ports::TransactionManager;

/// Command to archive a schedule.
#[derive(Debug, Clone)]
pub struct ArchiveScheduleCommand {
    pub schedule_id: ScheduleId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveScheduleResult {
    pub schedule: Schedule,
    pub summary: ArchiveSummary,
}

/// Handler for archiving schedules.
///
/// Already cancelled occurrences keep their original cancellation time;
/// repeating the command is a no-op rather than an error.
pub struct ArchiveScheduleHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl ArchiveScheduleHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        cmd: ArchiveScheduleCommand,
        metadata: CommandMetadata,
    ) -> Result<ArchiveScheduleResult, ServiceError> {
        let mut tx = self.transactions.begin().await?;
        let result = cascade::archive_schedule(tx.as_mut(), &cmd.schedule_id, Timestamp::now())
            .await
            .map_err(ServiceError::from);
        let (schedule, summary) =
            cascade::finish(tx, result, "archive_schedule", metadata.correlation_id()).await?;

        info!(
            schedule_id = %cmd.schedule_id,
            occurrences_cancelled = summary.occurrences_cancelled,
            correlation_id = metadata.correlation_id(),
            "Schedule archived"
        );
        Ok(ArchiveScheduleResult { schedule, summary })
    }
}
