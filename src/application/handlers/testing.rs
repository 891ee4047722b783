//! Test doubles shared by the handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::adapters::memory::InMemoryStore;
use crate::domain::agreement::{AgreementTerms, Occurrence};
use crate::domain::foundation::{
    CommandMetadata, LocationId, OccurrenceId, OrganizationId, ReportId, Timestamp,
};
use crate::domain::report::ReportProjection;
use crate::ports::{
    AgreementRepository, OccurrenceFilter, OccurrenceRepository, ReportFilter, ReportRepository,
    RepositoryError, ScheduleRepository, Transaction, TransactionManager,
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub(crate) fn metadata() -> CommandMetadata {
    CommandMetadata::new()
        .with_correlation_id("test-correlation")
        .with_source("test")
}

/// Agreement valid for the whole of 2024.
pub(crate) fn terms_2024() -> AgreementTerms {
    AgreementTerms {
        organization_id: OrganizationId::new(),
        location_id: LocationId::new(),
        valid_from: date(2024, 1, 1),
        valid_until: date(2024, 12, 31),
        note: None,
    }
}

/// Which repository call should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    OccurrenceInsert,
    ReportInsert,
    OccurrenceArchive,
}

/// In-memory store whose transactions fail one kind of call.
pub(crate) struct FaultyStore {
    inner: InMemoryStore,
    fault: Fault,
    begun: AtomicUsize,
}

impl FaultyStore {
    pub(crate) fn new(inner: InMemoryStore, fault: Fault) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fault,
            begun: AtomicUsize::new(0),
        })
    }

    pub(crate) fn transactions_begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionManager for FaultyStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, RepositoryError> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner.begin().await?;
        Ok(Box::new(FaultyTransaction {
            inner,
            fault: self.fault,
        }))
    }
}

struct FaultyTransaction {
    inner: Box<dyn Transaction>,
    fault: Fault,
}

#[async_trait]
impl Transaction for FaultyTransaction {
    fn agreements(&mut self) -> Box<dyn AgreementRepository + '_> {
        self.inner.agreements()
    }

    fn schedules(&mut self) -> Box<dyn ScheduleRepository + '_> {
        self.inner.schedules()
    }

    fn occurrences(&mut self) -> Box<dyn OccurrenceRepository + '_> {
        let fault = self.fault;
        Box::new(FaultyOccurrences {
            inner: self.inner.occurrences(),
            fault,
        })
    }

    fn reports(&mut self) -> Box<dyn ReportRepository + '_> {
        let fault = self.fault;
        Box::new(FaultyReports {
            inner: self.inner.reports(),
            fault,
        })
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.inner.rollback().await
    }
}

struct FaultyOccurrences<'a> {
    inner: Box<dyn OccurrenceRepository + 'a>,
    fault: Fault,
}

#[async_trait]
impl OccurrenceRepository for FaultyOccurrences<'_> {
    async fn insert(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        if self.fault == Fault::OccurrenceInsert {
            return Err(RepositoryError::insert("occurrence", "injected fault"));
        }
        self.inner.insert(occurrence).await
    }

    async fn insert_many(&mut self, occurrences: &[Occurrence]) -> Result<(), RepositoryError> {
        if self.fault == Fault::OccurrenceInsert {
            return Err(RepositoryError::insert("occurrence", "injected fault"));
        }
        self.inner.insert_many(occurrences).await
    }

    async fn update(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        self.inner.update(occurrence).await
    }

    async fn find(
        &mut self,
        filter: &OccurrenceFilter,
    ) -> Result<Vec<Occurrence>, RepositoryError> {
        self.inner.find(filter).await
    }

    async fn find_one(&mut self, id: &OccurrenceId) -> Result<Occurrence, RepositoryError> {
        self.inner.find_one(id).await
    }

    async fn archive(&mut self, id: &OccurrenceId, at: Timestamp) -> Result<(), RepositoryError> {
        if self.fault == Fault::OccurrenceArchive {
            return Err(RepositoryError::update("occurrence", "injected fault"));
        }
        self.inner.archive(id, at).await
    }
}

struct FaultyReports<'a> {
    inner: Box<dyn ReportRepository + 'a>,
    fault: Fault,
}

#[async_trait]
impl ReportRepository for FaultyReports<'_> {
    async fn insert(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        if self.fault == Fault::ReportInsert {
            return Err(RepositoryError::insert("report_projection", "injected fault"));
        }
        self.inner.insert(report).await
    }

    async fn update(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        self.inner.update(report).await
    }

    async fn find(
        &mut self,
        filter: &ReportFilter,
    ) -> Result<Vec<ReportProjection>, RepositoryError> {
        self.inner.find(filter).await
    }

    async fn find_one(&mut self, id: &ReportId) -> Result<ReportProjection, RepositoryError> {
        self.inner.find_one(id).await
    }

    async fn find_by_occurrence(
        &mut self,
        occurrence_id: &OccurrenceId,
    ) -> Result<Option<ReportProjection>, RepositoryError> {
        self.inner.find_by_occurrence(occurrence_id).await
    }
}
