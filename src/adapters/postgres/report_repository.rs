//! PostgreSQL implementation of ReportRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use super::columns::column;
use super::filter::push_report_filter;
use crate::domain::foundation::{OccurrenceId, ReportId, Timestamp};
use crate::domain::report::ReportProjection;
use crate::ports::{ReportFilter, ReportRepository, RepositoryError};

const ENTITY: &str = "report_projection";

const COLUMNS: &str = "id, occurrence_id, starts_at, ends_at, weight_kg, reported_at";

/// Report projection repository bound to an open transaction's connection.
pub struct PostgresReportRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresReportRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ReportRepository for PostgresReportRepository<'_> {
    async fn insert(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO report_projections (
                id, occurrence_id, starts_at, ends_at, weight_kg, reported_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(report.id().as_uuid())
        .bind(report.occurrence_id().as_uuid())
        .bind(report.starts_at())
        .bind(report.ends_at())
        .bind(report.weight_kg())
        .bind(report.reported_at().map(|t| *t.as_datetime()))
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::insert(ENTITY, e))?;

        Ok(())
    }

    async fn update(&mut self, report: &ReportProjection) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE report_projections SET weight_kg = $2, reported_at = $3 WHERE id = $1",
        )
        .bind(report.id().as_uuid())
        .bind(report.weight_kg())
        .bind(report.reported_at().map(|t| *t.as_datetime()))
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::update(ENTITY, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(ENTITY, report.id()));
        }
        Ok(())
    }

    async fn find(
        &mut self,
        filter: &ReportFilter,
    ) -> Result<Vec<ReportProjection>, RepositoryError> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM report_projections", COLUMNS));
        push_report_filter(&mut query, filter);
        query.push(" ORDER BY starts_at, id");

        let rows = query
            .build()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        rows.iter().map(row_to_report).collect()
    }

    async fn find_one(&mut self, id: &ReportId) -> Result<ReportProjection, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM report_projections WHERE id = $1",
            COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::select(ENTITY, e))?;

        match row {
            Some(row) => row_to_report(&row),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    async fn find_by_occurrence(
        &mut self,
        occurrence_id: &OccurrenceId,
    ) -> Result<Option<ReportProjection>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM report_projections WHERE occurrence_id = $1",
            COLUMNS
        ))
        .bind(occurrence_id.as_uuid())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::select(ENTITY, e))?;

        row.as_ref().map(row_to_report).transpose()
    }
}

fn row_to_report(row: &PgRow) -> Result<ReportProjection, RepositoryError> {
    let id: Uuid = column(row, "id", ENTITY)?;
    let occurrence_id: Uuid = column(row, "occurrence_id", ENTITY)?;
    let starts_at: NaiveDateTime = column(row, "starts_at", ENTITY)?;
    let ends_at: NaiveDateTime = column(row, "ends_at", ENTITY)?;
    let weight_kg: Option<f64> = column(row, "weight_kg", ENTITY)?;
    let reported_at: Option<DateTime<Utc>> = column(row, "reported_at", ENTITY)?;

    Ok(ReportProjection::reconstitute(
        ReportId::from_uuid(id),
        OccurrenceId::from_uuid(occurrence_id),
        starts_at,
        ends_at,
        weight_kg,
        reported_at.map(Timestamp::from_datetime),
    ))
}
