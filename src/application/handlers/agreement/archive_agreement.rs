//! ArchiveAgreementHandler - archives an agreement and cascades to every
//! schedule and occurrence under it.

use std::sync::Arc;

use tracing::info;

use crate::application::cascade::{self, ArchiveSummary};
use crate::application::ServiceError;
use crate::domain::agreement::Agreement;
use crate::domain::foundation::{AgreementId, CommandMetadata, Timestamp};
use crate::ports::{ScheduleFilter, Transaction, TransactionManager};

/// Command to archive an agreement.
#[derive(Debug, Clone)]
pub struct ArchiveAgreementCommand {
    pub agreement_id: AgreementId,
}

/// Result of a successful archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveAgreementResult {
    pub agreement: Agreement,
    pub summary: ArchiveSummary,
}

/// Handler for archiving agreements.
///
/// Idempotent: archiving twice keeps the first timestamps and reports an
/// empty summary the second time.
pub struct ArchiveAgreementHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl ArchiveAgreementHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        cmd: ArchiveAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<ArchiveAgreementResult, ServiceError> {
        let at = Timestamp::now();
        let mut tx = self.transactions.begin().await?;
        let result = archive(tx.as_mut(), &cmd.agreement_id, at).await;
        let result =
            cascade::finish(tx, result, "archive_agreement", metadata.correlation_id()).await?;

        info!(
            agreement_id = %cmd.agreement_id,
            schedules_archived = result.summary.schedules_archived,
            occurrences_cancelled = result.summary.occurrences_cancelled,
            correlation_id = metadata.correlation_id(),
            "Agreement archived"
        );
        Ok(result)
    }
}

async fn archive(
    tx: &mut dyn Transaction,
    agreement_id: &AgreementId,
    at: Timestamp,
) -> Result<ArchiveAgreementResult, ServiceError> {
    let mut agreement = tx.agreements().find_one(agreement_id).await?;
    if agreement.archive(at) {
        tx.agreements().archive(agreement_id, at).await?;
    }

    let schedules = tx
        .schedules()
        .find(&ScheduleFilter::new().with_agreement(*agreement_id))
        .await?;

    let mut summary = ArchiveSummary::default();
    for schedule in &schedules {
        let (_, archived) = cascade::archive_schedule(tx, schedule.id(), at).await?;
        summary.absorb(archived);
    }

    Ok(ArchiveAgreementResult { agreement, summary })
}
