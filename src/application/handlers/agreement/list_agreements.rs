//! ListAgreementsHandler - filtered agreement lookup.

use std::sync::Arc;

use crate::application::{cascade, ServiceError};
use crate::domain::agreement::Agreement;
use crate::domain::foundation::CommandMetadata;
use crate::ports::{AgreementFilter, TransactionManager};

/// Query for agreements; an empty filter lists all of them.
#[derive(Debug, Clone, Default)]
pub struct ListAgreementsQuery {
    pub filter: AgreementFilter,
}

pub struct ListAgreementsHandler {
    transactions: Arc<dyn TransactionManager>,
}

impl ListAgreementsHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: ListAgreementsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<Agreement>, ServiceError> {
        let mut tx = self.transactions.begin().await?;
        let result = tx
            .agreements()
            .find(&query.filter)
            .await
            .map_err(ServiceError::from);
        cascade::finish(tx, result, "list_agreements", metadata.correlation_id()).await
    }
}
