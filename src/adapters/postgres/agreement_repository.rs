//! PostgreSQL implementation of AgreementRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, QueryBuilder};
use uuid::Uuid;

use super::columns::{column, status_column};
use super::filter::push_agreement_filter;
use crate::domain::agreement::Agreement;
use crate::domain::foundation::{AgreementId, LocationId, OrganizationId, Timestamp};
use crate::ports::{AgreementFilter, AgreementRepository, RepositoryError};

const ENTITY: &str = "agreement";

const COLUMNS: &str = "id, organization_id, location_id, valid_from, valid_until, note, \
                       status, archived_at, created_at, updated_at";

/// Agreement repository bound to an open transaction's connection.
pub struct PostgresAgreementRepository<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PostgresAgreementRepository<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    async fn exists(&mut self, id: &AgreementId) -> Result<bool, RepositoryError> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM agreements WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl AgreementRepository for PostgresAgreementRepository<'_> {
    async fn insert(&mut self, agreement: &Agreement) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO agreements (
                id, organization_id, location_id, valid_from, valid_until, note,
                status, archived_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(agreement.id().as_uuid())
        .bind(agreement.organization_id().as_uuid())
        .bind(agreement.location_id().as_uuid())
        .bind(agreement.valid_from())
        .bind(agreement.valid_until())
        .bind(agreement.note())
        .bind(agreement.status().as_str())
        .bind(agreement.archived_at().map(|t| *t.as_datetime()))
        .bind(agreement.created_at().as_datetime())
        .bind(agreement.updated_at().as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::insert(ENTITY, e))?;

        Ok(())
    }

    async fn update(&mut self, agreement: &Agreement) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE agreements SET
                valid_from = $2,
                valid_until = $3,
                note = $4,
                status = $5,
                archived_at = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(agreement.id().as_uuid())
        .bind(agreement.valid_from())
        .bind(agreement.valid_until())
        .bind(agreement.note())
        .bind(agreement.status().as_str())
        .bind(agreement.archived_at().map(|t| *t.as_datetime()))
        .bind(agreement.updated_at().as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| RepositoryError::update(ENTITY, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(ENTITY, agreement.id()));
        }
        Ok(())
    }

    async fn find(&mut self, filter: &AgreementFilter) -> Result<Vec<Agreement>, RepositoryError> {
        let mut query = QueryBuilder::new(format!("SELECT {} FROM agreements", COLUMNS));
        push_agreement_filter(&mut query, filter);
        query.push(" ORDER BY valid_from, id");

        let rows = query
            .build()
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        rows.iter().map(row_to_agreement).collect()
    }

    async fn find_one(&mut self, id: &AgreementId) -> Result<Agreement, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {} FROM agreements WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| RepositoryError::select(ENTITY, e))?;

        match row {
            Some(row) => row_to_agreement(&row),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    async fn archive(&mut self, id: &AgreementId, at: Timestamp) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE agreements SET
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

fn row_to_agreement(row: &PgRow) -> Result<Agreement, RepositoryError> {
    let id: Uuid = column(row, "id", ENTITY)?;
    let organization_id: Uuid = column(row, "organization_id", ENTITY)?;
    let location_id: Uuid = column(row, "location_id", ENTITY)?;
    let valid_from: NaiveDate = column(row, "valid_from", ENTITY)?;
    let valid_until: NaiveDate = column(row, "valid_until", ENTITY)?;
    let note: Option<String> = column(row, "note", ENTITY)?;
    let status = status_column(row, ENTITY)?;
    let archived_at: Option<DateTime<Utc>> = column(row, "archived_at", ENTITY)?;
    let created_at: DateTime<Utc> = column(row, "created_at", ENTITY)?;
    let updated_at: DateTime<Utc> = column(row, "updated_at", ENTITY)?;

    Ok(Agreement::reconstitute(
        AgreementId::from_uuid(id),
        OrganizationId::from_uuid(organization_id),
        LocationId::from_uuid(location_id),
        valid_from,
        valid_until,
        note,
        status,
        archived_at.map(Timestamp::from_datetime),
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
