//! SQL reading of the lookup filters.
//!
//! Each present filter field appends exactly one bound condition; absent
//! fields append nothing, so an empty filter selects every row.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::ports::{AgreementFilter, OccurrenceFilter, ReportFilter, ScheduleFilter};

/// Appends `WHERE`/`AND` conditions to a query under construction.
struct Conditions<'q, 'b> {
    query: &'b mut QueryBuilder<'q, Postgres>,
    empty: bool,
}

impl<'q, 'b> Conditions<'q, 'b> {
    fn new(query: &'b mut QueryBuilder<'q, Postgres>) -> Self {
        Self { query, empty: true }
    }

    /// Starts a condition with `sql` and returns the builder for binding.
    fn and(&mut self, sql: &str) -> &mut QueryBuilder<'q, Postgres> {
        self.query.push(if self.empty { " WHERE " } else { " AND " });
        self.empty = false;
        self.query.push(sql)
    }
}

pub(super) fn push_agreement_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &AgreementFilter) {
    let mut conditions = Conditions::new(query);
    if let Some(id) = filter.organization_id {
        conditions.and("organization_id = ").push_bind(*id.as_uuid());
    }
    if let Some(id) = filter.location_id {
        conditions.and("location_id = ").push_bind(*id.as_uuid());
    }
    if let Some(status) = filter.status {
        conditions.and("status = ").push_bind(status.as_str());
    }
}

pub(super) fn push_schedule_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ScheduleFilter) {
    let mut conditions = Conditions::new(query);
    if let Some(id) = filter.agreement_id {
        conditions.and("agreement_id = ").push_bind(*id.as_uuid());
    }
    if let Some(id) = filter.location_id {
        conditions.and("location_id = ").push_bind(*id.as_uuid());
    }
    if let Some(status) = filter.status {
        conditions.and("status = ").push_bind(status.as_str());
    }
}

pub(super) fn push_occurrence_filter(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &OccurrenceFilter,
) {
    let mut conditions = Conditions::new(query);
    if let Some(id) = filter.schedule_id {
        conditions.and("schedule_id = ").push_bind(*id.as_uuid());
    }
    if let Some(from) = filter.starts_from {
        conditions.and("starts_at >= ").push_bind(from);
    }
    if let Some(until) = filter.starts_until {
        conditions.and("starts_at <= ").push_bind(until);
    }
    match filter.cancelled {
        Some(true) => {
            conditions.and("cancelled_at IS NOT NULL");
        }
        Some(false) => {
            conditions.and("cancelled_at IS NULL");
        }
        None => {}
    }
}

pub(super) fn push_report_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ReportFilter) {
    let mut conditions = Conditions::new(query);
    if let Some(ids) = &filter.occurrence_ids {
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        conditions
            .and("occurrence_id = ANY(")
            .push_bind(ids)
            .push(")");
    }
    match filter.reported {
        Some(true) => {
            conditions.and("reported_at IS NOT NULL");
        }
        Some(false) => {
            conditions.and("reported_at IS NULL");
        }
        None => {}
    }
}
