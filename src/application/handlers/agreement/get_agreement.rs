//! GetAgreementHandler - loads the persisted agreement graph.

use std::sync::Arc;

use tracing::debug;

use crate::application::{cascade, ServiceError};
use crate::domain::agreement::{AgreementGraph, ScheduleGraph};
use crate::domain::foundation::{AgreementId, CommandMetadata};
use crate::ports::{OccurrenceFilter, ScheduleFilter, Transaction, TransactionManager};

/// Query for one agreement with its schedules and occurrences.
#[derive(Debug, Clone)]
pub struct GetAgreementQuery {
    pub agreement_id: AgreementId,
}

/// Handler for loading agreement graphs.
///
/// Archived schedules and cancelled occurrences are included.
pub struct GetAgreementHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl GetAgreementHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: GetAgreementQuery,
        metadata: CommandMetadata,
    ) -> Result<AgreementGraph, ServiceError> {
        let mut tx = self.transactions.begin().await?;
        let result = load_graph(tx.as_mut(), &query.agreement_id).await;
        let graph = cascade::finish(tx, result, "get_agreement", metadata.correlation_id()).await?;

        debug!(
            agreement_id = %query.agreement_id,
            occurrences = graph.occurrence_count(),
            "Agreement graph loaded"
        );
        Ok(graph)
    }
}

async fn load_graph(
    tx: &mut dyn Transaction,
    agreement_id: &AgreementId,
) -> Result<AgreementGraph, ServiceError> {
    let agreement = tx.agreements().find_one(agreement_id).await?;
    let schedules = tx
        .schedules()
        .find(&ScheduleFilter::new().with_agreement(*agreement_id))
        .await?;

    let mut graphs = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        let occurrences = tx
            .occurrences()
            .find(&OccurrenceFilter::new().with_schedule(*schedule.id()))
            .await?;
        graphs.push(ScheduleGraph {
            schedule,
            occurrences,
        });
    }

    Ok(AgreementGraph {
        agreement,
        schedules: graphs,
    })
}
