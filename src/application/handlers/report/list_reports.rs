//! ListReportsHandler - report projection lookup.

use std::sync::Arc;

use crate::application::{cascade, ServiceError};
use crate::domain::foundation::CommandMetadata;
use crate::domain::report::ReportProjection;
use crate::ports::{ReportFilter, TransactionManager};

#[derive(Debug, Clone, Default)]
pub struct ListReportsQuery {
    pub filter: ReportFilter,
}

pub struct ListReportsHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl ListReportsHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: ListReportsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<ReportProjection>, ServiceError> {
        let mut tx = self.transactions.begin().await?;
        let result = tx
            .reports()
            .find(&query.filter)
            .await
            .map_err(ServiceError::from);
        cascade::finish(tx, result, "list_reports", metadata.correlation_id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::agreement::{
        CreateAgreementCommand, CreateAgreementHandler, ScheduleRequest,
    };
    use crate::application::handlers::testing::{date, metadata, terms_2024, time};
    use crate::domain::foundation::LocationId;
    use crate::domain::recurrence::RecurrenceRuleParams;

    #[tokio::test]
    async fn each_occurrence_has_one_unreported_projection() {
        let store = Arc::new(InMemoryStore::new());
        let graph = CreateAgreementHandler::new(store.clone(), 1000)
            .handle(
                CreateAgreementCommand {
                    terms: terms_2024(),
                    schedules: vec![ScheduleRequest {
                        location_id: LocationId::new(),
                        start_time: time(16, 0),
                        end_time: time(17, 0),
                        valid_from: date(2024, 10, 1),
                        valid_until: date(2024, 12, 31),
                        note: None,
                        recurrence: Some(RecurrenceRuleParams {
                            interval: 3,
                            weekdays: None,
                            termination_count: Some(4),
                            termination_date: None,
                        }),
                    }],
                },
                metadata(),
            )
            .await
            .unwrap();

        let reports = ListReportsHandler::new(store)
            .handle(
                ListReportsQuery {
                    filter: ReportFilter::new()
                        .with_occurrences(graph.occurrences().map(|o| *o.id()))
                        .with_reported(false),
                },
                metadata(),
            )
            .await
            .unwrap();

        assert_eq!(reports.len(), 4);
        for (report, occurrence) in reports.iter().zip(graph.occurrences()) {
            assert_eq!(report.occurrence_id(), occurrence.id());
            assert_eq!(report.starts_at(), occurrence.starts_at());
            assert_eq!(report.ends_at(), occurrence.ends_at());
        }
    }
}
