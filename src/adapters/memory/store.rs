//! In-memory store with snapshot-and-swap transactions.
//!
//! A transaction holds the store's write lock for its whole life and works
//! on a staged copy of the state. Commit swaps the copy in; rollback or drop
//! discards it. Transactions are therefore fully serialized.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::debug;

use super::repositories::{
    InMemoryAgreementRepository, InMemoryOccurrenceRepository, InMemoryReportRepository,
    InMemoryScheduleRepository,
};
use crate::domain::agreement::{Agreement, Occurrence, Schedule};
use crate::domain::foundation::{AgreementId, OccurrenceId, ReportId, ScheduleId};
use crate::domain::report::ReportProjection;
use crate::ports::{
    AgreementRepository, OccurrenceRepository, ReportRepository, RepositoryError,
    ScheduleRepository, Transaction, TransactionManager,
};

/// Every table of the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub(crate) agreements: HashMap<AgreementId, Agreement>,
    pub(crate) schedules: HashMap<ScheduleId, Schedule>,
    pub(crate) occurrences: HashMap<OccurrenceId, Occurrence>,
    pub(crate) reports: HashMap<ReportId, ReportProjection>,
}

/// Row counts of a committed store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub agreements: usize,
    pub schedules: usize,
    pub occurrences: usize,
    pub reports: usize,
}

/// In-memory implementation of [`TransactionManager`].
///
/// Cloning is cheap and every clone shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row counts of the committed state. Waits for any open transaction.
    pub async fn counts(&self) -> StoreCounts {
        let state = self.state.read().await;
        StoreCounts {
            agreements: state.agreements.len(),
            schedules: state.schedules.len(),
            occurrences: state.occurrences.len(),
            reports: state.reports.len(),
        }
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
        let guard = Arc::clone(&self.state).write_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }
}

/// Transaction over an [`InMemoryStore`].
pub struct InMemoryTransaction {
    guard: OwnedRwLockWriteGuard<StoreState>,
    staged: StoreState,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    fn agreements(&mut self) -> Box<dyn AgreementRepository + '_> {
        Box::new(InMemoryAgreementRepository::new(&mut self.staged))
    }

    fn schedules(&mut self) -> Box<dyn ScheduleRepository + '_> {
        Box::new(InMemoryScheduleRepository::new(&mut self.staged))
    }

    fn occurrences(&mut self) -> Box<dyn OccurrenceRepository + '_> {
        Box::new(InMemoryOccurrenceRepository::new(&mut self.staged))
    }

    fn reports(&mut self) -> Box<dyn ReportRepository + '_> {
        Box::new(InMemoryReportRepository::new(&mut self.staged))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        debug!(
            agreements = staged.agreements.len(),
            occurrences = staged.occurrences.len(),
            "Committing in-memory transaction"
        );
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        debug!("Rolling back in-memory transaction");
        Ok(())
    }
}
