//! Row decoding helpers shared by the Postgres repositories.

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

use crate::domain::foundation::RecordStatus;
use crate::ports::RepositoryError;

/// Reads one column, mapping decode failures to `Corrupt`.
pub(super) fn column<'r, T>(
    row: &'r PgRow,
    name: &str,
    entity: &'static str,
) -> Result<T, RepositoryError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::corrupt(entity, format!("column {}: {}", name, e)))
}

pub(super) fn status_column(row: &PgRow, entity: &'static str) -> Result<RecordStatus, RepositoryError> {
    let raw: String = column(row, "status", entity)?;
    RecordStatus::parse(&raw)
        .ok_or_else(|| RepositoryError::corrupt(entity, format!("invalid status: {}", raw)))
}
