//! ListOccurrencesHandler - filtered occurrence lookup.

use std::sync::Arc;

use crate::application::{cascade, ServiceError};
use crate::domain::agreement::Occurrence;
use crate::domain::foundation::{CommandMetadata, ValidationError};
use crate::ports::{OccurrenceFilter, TransactionManager};

/// Query for occurrences ordered by start.
#[derive(Debug, Clone, Default)]
pub struct ListOccurrencesQuery {
    pub filter: OccurrenceFilter,
}

pub struct ListOccurrencesHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl ListOccurrencesHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: ListOccurrencesQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<Occurrence>, ServiceError> {
        if let (Some(from), Some(until)) = (query.filter.starts_from, query.filter.starts_until) {
            if until < from {
                return Err(ValidationError::invalid_window(
                    "starts_until",
                    format!("{} is before starts_from {}", until, from),
                )
                .into());
            }
        }

        let mut tx = self.transactions.begin().await?;
        let result = tx
            .occurrences()
            .find(&query.filter)
            .await
            .map_err(ServiceError::from);
        cascade::finish(tx, result, "list_occurrences", metadata.correlation_id()).await
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
    use crate::domain::foundation::{ErrorCode, LocationId};
    use crate::domain::recurrence::RecurrenceRuleParams;

    #[tokio::test]
    async fn filters_by_schedule_and_start_range() {
        let store = Arc::new(InMemoryStore::new());
        let graph = CreateAgreementHandler::new(store.clone(), 1000)
            .handle(
                CreateAgreementCommand {
                    terms: terms_2024(),
                    schedules: vec![ScheduleRequest {
                        location_id: LocationId::new(),
                        start_time: time(9, 0),
                        end_time: time(10, 0),
                        valid_from: date(2024, 1, 1),
                        valid_until: date(2024, 3, 31),
                        note: None,
                        recurrence: Some(RecurrenceRuleParams {
                            interval: 1,
                            weekdays: None,
                            termination_count: None,
                            termination_date: Some(date(2024, 3, 31)),
                        }),
                    }],
                },
                metadata(),
            )
            .await
            .unwrap();
        let schedule_id = *graph.schedules[0].schedule.id();

        let february = ListOccurrencesHandler::new(store)
            .handle(
                ListOccurrencesQuery {
                    filter: OccurrenceFilter::new()
                        .with_schedule(schedule_id)
                        .with_starts_from(date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap())
                        .with_starts_until(date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap()),
                },
                metadata(),
            )
            .await
            .unwrap();

        // Mondays in February 2024: 5, 12, 19, 26.
        let days: Vec<u32> = february
            .iter()
            .map(|o| chrono::Datelike::day(&o.starts_at()))
            .collect();
        assert_eq!(days, vec![5, 12, 19, 26]);
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let err = ListOccurrencesHandler::new(Arc::new(InMemoryStore::new()))
            .handle(
                ListOccurrencesQuery {
                    filter: OccurrenceFilter::new()
                        .with_starts_from(date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap())
                        .with_starts_until(date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()),
                },
                metadata(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
