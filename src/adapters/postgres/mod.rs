//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTransactionManager` - Opens transactions on a `PgPool`
//! - `Postgres*Repository` - Per-entity repositories bound to one transaction
//!
//! Schema lives in `migrations/` at the crate root.

mod agreement_repository;
mod columns;
mod filter;
mod occurrence_repository;
mod report_repository;
mod schedule_repository;
mod transaction;

pub use agreement_repository::PostgresAgreementRepository;
pub use occurrence_repository::PostgresOccurrenceRepository;
pub use report_repository::PostgresReportRepository;
pub use schedule_repository::PostgresScheduleRepository;
pub use transaction::{PostgresTransaction, PostgresTransactionManager};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Opens a connection pool sized and timed by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await?;
    info!(
        max_connections = config.max_connections,
        "PostgreSQL pool connected"
    );
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
