//! Repository handles over a transaction's staged state.
//!
//! Inserts enforce the same keys the Postgres schema does: unique ids, a
//! parent row for every child, and one projection per occurrence.

use async_trait::async_trait;
use std::collections::HashSet;

use super::store::StoreState;
use crate::domain::agreement::{Agreement, Occurrence, Schedule};
use crate::domain::foundation::{AgreementId, OccurrenceId, ReportId, ScheduleId, Timestamp};
use crate::domain::report::ReportProjection;
use crate::ports::{
    AgreementFilter, AgreementRepository, OccurrenceFilter, OccurrenceRepository, ReportFilter,
    ReportRepository, RepositoryError, ScheduleFilter, ScheduleRepository,
};

// ════════════════════════════════════════════════════════════════════════════════
// Agreements
// ════════════════════════════════════════════════════════════════════════════════

pub(crate) struct InMemoryAgreementRepository<'a> {
    state: &'a mut StoreState,
}

impl<'a> InMemoryAgreementRepository<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AgreementRepository for InMemoryAgreementRepository<'_> {
    async fn insert(&mut self, agreement: &Agreement) -> Result<(), RepositoryError> {
        if self.state.agreements.contains_key(agreement.id()) {
            return Err(RepositoryError::insert(
                "agreement",
                format!("duplicate id {}", agreement.id()),
            ));
        }
        self.state
            .agreements
            .insert(*agreement.id(), agreement.clone());
        Ok(())
    }

    async fn update(&mut self, agreement: &Agreement) -> Result<(), RepositoryError> {
        let row = self
            .state
            .agreements
            .get_mut(agreement.id())
            .ok_or_else(|| RepositoryError::not_found("agreement", agreement.id()))?;
        *row = agreement.clone();
        Ok(())
    }

    async fn find(&mut self, filter: &AgreementFilter) -> Result<Vec<Agreement>, RepositoryError> {
        let mut found: Vec<Agreement> = self
            .state
            .agreements
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.valid_from(), *a.id()));
        Ok(found)
    }

    async fn find_one(&mut self, id: &AgreementId) -> Result<Agreement, RepositoryError> {
        self.state
            .agreements
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("agreement", id))
    }

    async fn archive(&mut self, id: &AgreementId, at: Timestamp) -> Result<(), RepositoryError> {
        let row = self
            .state
            .agreements
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("agreement", id))?;
        row.archive(at);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Schedules
// ════════════════════════════════════════════════════════════════════════════════

pub(crate) struct InMemoryScheduleRepository<'a> {
    state: &'a mut StoreState,
}

impl<'a> InMemoryScheduleRepository<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository<'_> {
    async fn insert(&mut self, schedule: &Schedule) -> Result<(), RepositoryError> {
        if self.state.schedules.contains_key(schedule.id()) {
            return Err(RepositoryError::insert(
                "schedule",
                format!("duplicate id {}", schedule.id()),
            ));
        }
        if !self.state.agreements.contains_key(schedule.agreement_id()) {
            return Err(RepositoryError::insert(
                "schedule",
                format!("agreement {} does not exist", schedule.agreement_id()),
            ));
        }
        self.state.schedules.insert(*schedule.id(), schedule.clone());
        Ok(())
    }

    async fn update(&mut self, schedule: &Schedule) -> Result<(), RepositoryError> {
        let row = self
            .state
            .schedules
            .get_mut(schedule.id())
            .ok_or_else(|| RepositoryError::not_found("schedule", schedule.id()))?;
        *row = schedule.clone();
        Ok(())
    }

    async fn find(&mut self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, RepositoryError> {
        let mut found: Vec<Schedule> = self
            .state
            .schedules
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.valid_from(), s.start_time(), *s.id()));
        Ok(found)
    }

    async fn find_one(&mut self, id: &ScheduleId) -> Result<Schedule, RepositoryError> {
        self.state
            .schedules
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("schedule", id))
    }

    async fn archive(&mut self, id: &ScheduleId, at: Timestamp) -> Result<(), RepositoryError> {
        let row = self
            .state
            .schedules
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("schedule", id))?;
        row.archive(at);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Occurrences
// ════════════════════════════════════════════════════════════════════════════════

pub(crate) struct InMemoryOccurrenceRepository<'a> {
    state: &'a mut StoreState,
}

impl<'a> InMemoryOccurrenceRepository<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self { state }
    }

    fn check_insertable(&self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        if self.state.occurrences.contains_key(occurrence.id()) {
            return Err(RepositoryError::insert(
                "occurrence",
                format!("duplicate id {}", occurrence.id()),
            ));
        }
        if !self.state.schedules.contains_key(occurrence.schedule_id()) {
            return Err(RepositoryError::insert(
                "occurrence",
                format!("schedule {} does not exist", occurrence.schedule_id()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OccurrenceRepository for InMemoryOccurrenceRepository<'_> {
    async fn insert(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        self.check_insertable(occurrence)?;
        self.state
            .occurrences
            .insert(*occurrence.id(), occurrence.clone());
        Ok(())
    }

    async fn insert_many(&mut self, occurrences: &[Occurrence]) -> Result<(), RepositoryError> {
        let mut batch = HashSet::with_capacity(occurrences.len());
        for occurrence in occurrences {
            self.check_insertable(occurrence)?;
            if !batch.insert(*occurrence.id()) {
                return Err(RepositoryError::insert(
                    "occurrence",
                    format!("duplicate id {} in batch", occurrence.id()),
                ));
            }
        }
        for occurrence in occurrences {
            self.state
                .occurrences
                .insert(*occurrence.id(), occurrence.clone());
        }
        Ok(())
    }

    async fn update(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        let row = self
            .state
            .occurrences
            .get_mut(occurrence.id())
            .ok_or_else(|| RepositoryError::not_found("occurrence", occurrence.id()))?;
        *row = occurrence.clone();
        Ok(())
    }

    async fn find(
        &mut self,
        filter: &OccurrenceFilter,
    ) -> Result<Vec<Occurrence>, RepositoryError> {
        let mut found: Vec<Occurrence> = self
            .state
            .occurrences
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        found.sort_by_key(|o| (o.starts_at(), *o.id()));
        Ok(found)
    }

    async fn find_one(&mut self, id: &OccurrenceId) -> Result<Occurrence, RepositoryError> {
        self.state
            .occurrences
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("occurrence", id))
    }

    async fn archive(&mut self, id: &OccurrenceId, at: Timestamp) -> Result<(), RepositoryError> {
        let row = self
            .state
            .occurrences
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("occurrence", id))?;
        row.cancel(at);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Report projections
// ════════════════════════════════════════════════════════════════════════════════

pub(crate) struct InMemoryReportRepository<'a> {
    state: &'a mut StoreState,
}

impl<'a> InMemoryReportRepository<'a> {
    pub(crate) fn new(state: &'a mut StoreState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository<'_> {
    async fn insert(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        if self.state.reports.contains_key(report.id()) {
            return Err(RepositoryError::insert(
                "report_projection",
                format!("duplicate id {}", report.id()),
            ));
        }
        if !self.state.occurrences.contains_key(report.occurrence_id()) {
            return Err(RepositoryError::insert(
                "report_projection",
                format!("occurrence {} does not exist", report.occurrence_id()),
            ));
        }
        if self
            .state
            .reports
            .values()
            .any(|r| r.occurrence_id() == report.occurrence_id())
        {
            return Err(RepositoryError::insert(
                "report_projection",
                format!("occurrence {} already has a projection", report.occurrence_id()),
            ));
        }
        self.state.reports.insert(*report.id(), report.clone());
        Ok(())
    }

    async fn update(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        let row = self
            .state
            .reports
            .get_mut(report.id())
            .ok_or_else(|| RepositoryError::not_found("report_projection", report.id()))?;
        *row = report.clone();
        Ok(())
    }

    async fn find(
        &mut self,
        filter: &ReportFilter,
    ) -> Result<Vec<ReportProjection>, RepositoryError> {
        let mut found: Vec<ReportProjection> = self
            .state
            .reports
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.starts_at(), *r.id()));
        Ok(found)
    }

    async fn find_one(&mut self, id: &ReportId) -> Result<ReportProjection, RepositoryError> {
        self.state
            .reports
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("report_projection", id))
    }

    async fn find_by_occurrence(
        &mut self,
        occurrence_id: &OccurrenceId,
    ) -> Result<Option<ReportProjection>, RepositoryError> {
        Ok(self
            .state
            .reports
            .values()
            .find(|r| r.occurrence_id() == occurrence_id)
            .cloned())
    }
}
