//! PostgreSQL transaction manager.
//!
//! Each `begin` opens one `sqlx` transaction; every repository handed out
//! by it runs on that transaction's connection.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use super::{
    PostgresAgreementRepository, PostgresOccurrenceRepository, PostgresReportRepository,
    PostgresScheduleRepository,
};
use crate::ports::{
    AgreementRepository, OccurrenceRepository, ReportRepository, RepositoryError,
    ScheduleRepository, Transaction, TransactionManager,
};

/// PostgreSQL implementation of [`TransactionManager`].
#[derive(Clone)]
pub struct PostgresTransactionManager {
    pool: PgPool,
}

impl PostgresTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(RepositoryError::transaction)?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// An open `sqlx` transaction. Dropping it without commit rolls back.
pub struct PostgresTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl Transaction for PostgresTransaction {
    fn agreements(&mut self) -> Box<dyn AgreementRepository + '_> {
        Box::new(PostgresAgreementRepository::new(&mut self.tx))
    }

    fn schedules(&mut self) -> Box<dyn ScheduleRepository + '_> {
        Box::new(PostgresScheduleRepository::new(&mut self.tx))
    }

    fn occurrences(&mut self) -> Box<dyn OccurrenceRepository + '_> {
        Box::new(PostgresOccurrenceRepository::new(&mut self.tx))
    }

    fn reports(&mut self) -> Box<dyn ReportRepository + '_> {
        Box::new(PostgresReportRepository::new(&mut self.tx))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await.map_err(RepositoryError::transaction)?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx
            .rollback()
            .await
            .map_err(RepositoryError::transaction)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
