use std::process::ExitCode;

use tracing::{error, info};

use pickup_scheduler::adapters::postgres::{self, PostgresTransactionManager};
use pickup_scheduler::config::AppConfig;
use pickup_scheduler::ports::TransactionManager;
use pickup_scheduler::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init_tracing(&config.logging) {
        eprintln!("Failed to initialise tracing: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Pickup scheduler failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    info!(
        database = %config.database.redacted_url(),
        max_occurrences_per_schedule = config.scheduling.max_occurrences_per_schedule,
        "Configuration loaded"
    );

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
    }

    // Round-trip one transaction so a broken database fails startup.
    let transactions = PostgresTransactionManager::new(pool);
    transactions.begin().await?.rollback().await?;

    info!("Pickup scheduler ready");
    Ok(())
}
