//! Transaction context threaded through every cascade.
//!
//! Handlers open one transaction per command, borrow repository handles
//! from it, and finish with exactly one of `commit` or `rollback`.
//! Dropping a transaction without committing discards its writes.

use async_trait::async_trait;

use super::{
    AgreementRepository, OccurrenceRepository, ReportRepository, RepositoryError,
    ScheduleRepository,
};

/// Opens transactions against a store.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// # Errors
    ///
    /// - `Transaction` if the store cannot start one
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError>;
}

/// One open unit of work.
///
/// Repository handles borrow the transaction mutably, so only one is live
/// at a time and none can outlive the commit.
#[async_trait]
pub trait Transaction: Send {
    fn agreements(&mut self) -> Box<dyn AgreementRepository + '_>;

    fn schedules(&mut self) -> Box<dyn ScheduleRepository + '_>;

    fn occurrences(&mut self) -> Box<dyn OccurrenceRepository + '_>;

    fn reports(&mut self) -> Box<dyn ReportRepository + '_>;

    /// Make every write of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
