//! UpdateScheduleHandler - edits a schedule row.
//!
//! Only the schedule row changes. Occurrences generated at creation time
//! are left exactly as they were, even when the time or validity window
//! moves; reconciling them is not done here.

use std::sync::Arc;

use tracing::info;

use crate::application::{cascade, ServiceError};
use crate::domain::agreement::{Schedule, ScheduleChanges};
use crate::domain::foundation::{CommandMetadata, ScheduleId, Timestamp, ValidationError};
use crate::ports::{Transaction, TransactionManager};

/// Command to update a schedule.
#[derive(Debug, Clone)]
pub struct UpdateScheduleCommand {
    pub schedule_id: ScheduleId,
    pub changes: ScheduleChanges,
}

pub struct UpdateScheduleHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl UpdateScheduleHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        cmd: UpdateScheduleCommand,
        metadata: CommandMetadata,
    ) -> Result<Schedule, ServiceError> {
        if cmd.changes.is_empty() {
            return Err(ValidationError::empty_field("changes").into());
        }

        let mut tx = self.transactions.begin().await?;
        let result = update(tx.as_mut(), cmd).await;
        let schedule =
            cascade::finish(tx, result, "update_schedule", metadata.correlation_id()).await?;

        info!(
            schedule_id = %schedule.id(),
            correlation_id = metadata.correlation_id(),
            "Schedule updated"
        );
        Ok(schedule)
    }
}

async fn update(
    tx: &mut dyn Transaction,
    cmd: UpdateScheduleCommand,
) -> Result<Schedule, ServiceError> {
    let mut schedule = tx.schedules().find_one(&cmd.schedule_id).await?;
    if schedule.is_archived() {
        return Err(ServiceError::invalid_state(format!(
            "schedule {} is archived",
            cmd.schedule_id
        )));
    }

    schedule.apply(cmd.changes, Timestamp::now())?;

    let agreement = tx.agreements().find_one(schedule.agreement_id()).await?;
    if !agreement.covers(schedule.valid_from(), schedule.valid_until()) {
        return Err(ValidationError::OutsideAgreement {
            from: schedule.valid_from(),
            until: schedule.valid_until(),
        }
        .into());
    }

    tx.schedules().update(&schedule).await?;
    Ok(schedule)
}
