//! PostgreSQL implementation of ScheduleRepository.
//!
//! The recurrence rule is stored as JSONB. Reading it back goes through the
//! rule's validating deserializer, so a hand-edited row that breaks the
//! rule invariants surfaces as `Corrupt` instead of a bad expansion.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use super::columns::{column, status_column};
use super::filter::push_schedule_filter;
use crate::domain::agreement::Schedule;
use crate::domain::foundation::{AgreementId, LocationId, ScheduleId, Timestamp};
use crate::domain::recurrence::RecurrenceRule;
use crate::ports::{RepositoryError, ScheduleFilter, ScheduleRepository};

const ENTITY: &str = "schedule";

const COLUMNS: &str = "id, agreement_id, location_id, start_time, end_time, valid_from, \
                       valid_until, note, recurrence, status, archived_at, created_at, updated_at";

/// Schedule repository bound to an open transaction's connection.
pub struct PostgresScheduleRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresScheduleRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    async fn exists(&mut self, id: &ScheduleId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM schedules WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository<'_> {
    async fn insert(&mut self, schedule: &Schedule) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO schedules (
                id, agreement_id, location_id, start_time, end_time, valid_from,
                valid_until, note, recurrence, status, archived_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(schedule.id().as_uuid())
        .bind(schedule.agreement_id().as_uuid())
        .bind(schedule.location_id().as_uuid())
        .bind(schedule.start_time())
        .bind(schedule.end_time())
        .bind(schedule.valid_from())
        .bind(schedule.valid_until())
        .bind(schedule.note())
        .bind(schedule.recurrence().map(|rule| Json(*rule)))
        .bind(schedule.status().as_str())
        .bind(schedule.archived_at().map(|t| *t.as_datetime()))
        .bind(schedule.created_at().as_datetime())
        .bind(schedule.updated_at().as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::insert(ENTITY, e))?;

        Ok(())
    }

    async fn update(&mut self, schedule: &Schedule) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE schedules SET
                start_time = $2,
                end_time = $3,
                valid_from = $4,
                valid_until = $5,
                note = $6,
                status = $7,
                archived_at = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(schedule.id().as_uuid())
        .bind(schedule.start_time())
        .bind(schedule.end_time())
        .bind(schedule.valid_from())
        .bind(schedule.valid_until())
        .bind(schedule.note())
        .bind(schedule.status().as_str())
        .bind(schedule.archived_at().map(|t| *t.as_datetime()))
        .bind(schedule.updated_at().as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::update(ENTITY, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(ENTITY, schedule.id()));
        }
        Ok(())
    }

    async fn find(&mut self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, RepositoryError> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM schedules", COLUMNS));
        push_schedule_filter(&mut query, filter);
        query.push(" ORDER BY valid_from, start_time, id");

        let rows = query
            .build()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        rows.iter().map(row_to_schedule).collect()
    }

    async fn find_one(&mut self, id: &ScheduleId) -> Result<Schedule, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {} FROM schedules WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        match row {
            Some(row) => row_to_schedule(&row),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    async fn archive(&mut self, id: &ScheduleId, at: Timestamp) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE schedules SET
                status = 'archived',
                archived_at = $2,
                updated_at = $2
            WHERE id = $1 AND status <> 'archived'
            "#,
        )
        .bind(id.as_uuid())
        .bind(at.as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::update(ENTITY, e))?;

        if result.rows_affected() == 0 && !self.exists(id).await? {
            return Err(RepositoryError::not_found(ENTITY, id));
        }
        Ok(())
    }
}

fn row_to_schedule(row: &PgRow) -> Result<Schedule, RepositoryError> {
    let id: Uuid = column(row, "id", ENTITY)?;
    let agreement_id: Uuid = column(row, "agreement_id", ENTITY)?;
    let location_id: Uuid = column(row, "location_id", ENTITY)?;
    let start_time: NaiveTime = column(row, "start_time", ENTITY)?;
    let end_time: NaiveTime = column(row, "end_time", ENTITY)?;
    let valid_from: NaiveDate = column(row, "valid_from", ENTITY)?;
    let valid_until: NaiveDate = column(row, "valid_until", ENTITY)?;
    let note: Option<String> = column(row, "note", ENTITY)?;
    let recurrence: Option<Json<RecurrenceRule>> = column(row, "recurrence", ENTITY)?;
    let status = status_column(row, ENTITY)?;
    let archived_at: Option<DateTime<Utc>> = column(row, "archived_at", ENTITY)?;
    let created_at: DateTime<Utc> = column(row, "created_at", ENTITY)?;
    let updated_at: DateTime<Utc> = column(row, "updated_at", ENTITY)?;

    Ok(Schedule::reconstitute(
        ScheduleId::from_uuid(id),
        AgreementId::from_uuid(agreement_id),
        LocationId::from_uuid(location_id),
        start_time,
        end_time,
        valid_from,
        valid_until,
        note,
        recurrence.map(|Json(rule)| rule),
        status,
        archived_at.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
