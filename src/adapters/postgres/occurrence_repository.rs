//! PostgreSQL implementation of OccurrenceRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use super::columns::column;
use super::filter::push_occurrence_filter;
use crate::domain::agreement::Occurrence;
use crate::domain::foundation::{OccurrenceId, ScheduleId, Timestamp};
use crate::ports::{OccurrenceFilter, OccurrenceRepository, RepositoryError};

const ENTITY: &str = "occurrence";

const COLUMNS: &str = "id, schedule_id, starts_at, ends_at, note, cancelled_at, created_at";

/// Rows per multi-row INSERT. Seven binds per row keeps each statement well
/// under Postgres' 65535 bind parameter limit.
const INSERT_CHUNK: usize = 1000;

/// Occurrence repository bound to an open transaction's connection.
pub struct PostgresOccurrenceRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresOccurrenceRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    async fn exists(&mut self, id: &OccurrenceId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM occurrences WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl OccurrenceRepository for PostgresOccurrenceRepository<'_> {
    async fn insert(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        self.insert_many(std::slice::from_ref(occurrence)).await
    }

    /// Batch insert. A failing chunk aborts the surrounding transaction, so
    /// earlier chunks never commit on their own.
    async fn insert_many(&mut self, occurrences: &[Occurrence]) -> Result<(), RepositoryError> {
        for chunk in occurrences.chunks(INSERT_CHUNK) {
            let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO occurrences \
                 (id, schedule_id, starts_at, ends_at, note, cancelled_at, created_at) ",
            );
            query.push_values(chunk, |mut row, occurrence| {
                row.push_bind(*occurrence.id().as_uuid())
                    .push_bind(*occurrence.schedule_id().as_uuid())
                    .push_bind(occurrence.starts_at())
                    .push_bind(occurrence.ends_at())
                    .push_bind(occurrence.note().map(str::to_owned))
                    .push_bind(occurrence.cancelled_at().map(|t| *t.as_datetime()))
                    .push_bind(*occurrence.created_at().as_datetime());
            });
            query
                .build()
                .execute(&mut *self.conn)
                .await
                .map_err(|e| RepositoryError::insert(ENTITY, e))?;
        }
        Ok(())
    }

    async fn update(&mut self, occurrence: &Occurrence) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE occurrences SET
                starts_at = $2,
                ends_at = $3,
                note = $4,
                cancelled_at = $5
            WHERE id = $1
            "#,
        )
        .bind(occurrence.id().as_uuid())
        .bind(occurrence.starts_at())
        .bind(occurrence.ends_at())
        .bind(occurrence.note())
        .bind(occurrence.cancelled_at().map(|t| *t.as_datetime()))
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::update(ENTITY, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(ENTITY, occurrence.id()));
        }
        Ok(())
    }

    async fn find(
        &mut self,
        filter: &OccurrenceFilter,
    ) -> Result<Vec<Occurrence>, RepositoryError> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM occurrences", COLUMNS));
        push_occurrence_filter(&mut query, filter);
        query.push(" ORDER BY starts_at, id");

        let rows = query
            .build()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        rows.iter().map(row_to_occurrence).collect()
    }

    async fn find_one(&mut self, id: &OccurrenceId) -> Result<Occurrence, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {} FROM occurrences WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        match row {
            Some(row) => row_to_occurrence(&row),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    async fn archive(&mut self, id: &OccurrenceId, at: Timestamp) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE occurrences SET cancelled_at = $2 WHERE id = $1 AND cancelled_at IS NULL",
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

fn row_to_occurrence(row: &PgRow) -> Result<Occurrence, RepositoryError> {
    let id: Uuid = column(row, "id", ENTITY)?;
    let schedule_id: Uuid = column(row, "schedule_id", ENTITY)?;
    let starts_at: NaiveDateTime = column(row, "starts_at", ENTITY)?;
    let ends_at: NaiveDateTime = column(row, "ends_at", ENTITY)?;
    let note: Option<String> = column(row, "note", ENTITY)?;
    let cancelled_at: Option<DateTime<Utc>> = column(row, "cancelled_at", ENTITY)?;
    let created_at: DateTime<Utc> = column(row, "created_at", ENTITY)?;

    Ok(Occurrence::reconstitute(
        OccurrenceId::from_uuid(id),
        ScheduleId::from_uuid(schedule_id),
        starts_at,
        ends_at,
        note,
        cancelled_at.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
    ))
}
