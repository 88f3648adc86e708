//! Jobs command - Billing job worker and queue management.
//!
//! ```bash
//! apartment-api jobs work
//! apartment-api jobs enqueue generate-monthly --month 11
//! apartment-api jobs enqueue mark-overdue
//! apartment-api jobs list
//! apartment-api jobs clear
//! ```

use std::sync::Arc;

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::{PgPool, PgPoolOptions};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::cli::args::{EnqueueArgs, JobKind, JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_BILLING};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::jobs::{billing_job_handler, BillingJob};
use crate::services::{BillService, Services};

pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(config).await,
        JobsAction::Enqueue(enqueue) => enqueue_job(&config, enqueue).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

impl From<EnqueueArgs> for BillingJob {
    fn from(args: EnqueueArgs) -> Self {
        match args.job {
            JobKind::GenerateMonthly => BillingJob::GenerateMonthly {
                year: args.year,
                month: args.month,
            },
            JobKind::MarkOverdue => BillingJob::MarkOverdue,
        }
    }
}

/// Pool with the apalis tables in place.
async fn job_pool(config: &Config) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(pool)
}

async fn run_worker(config: Config) -> AppResult<()> {
    tracing::info!("Connecting to database for billing worker...");

    let db = Database::connect(&config).await?;
    let bills: Arc<dyn BillService> =
        Services::from_connection(db.get_connection(), config.clone())?.bills;

    let storage: PostgresStorage<BillingJob> = PostgresStorage::new(job_pool(&config).await?);

    let worker = WorkerBuilder::new(JOB_NAME_BILLING)
        .data(bills)
        .backend(storage)
        .build_fn(billing_job_handler);

    tracing::info!("Billing worker started. Press Ctrl+C to stop.");

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Billing worker stopped.");
    Ok(())
}

async fn enqueue_job(config: &Config, args: EnqueueArgs) -> AppResult<()> {
    let job = BillingJob::from(args);
    let mut storage: PostgresStorage<BillingJob> = PostgresStorage::new(job_pool(config).await?);

    storage
        .push(job.clone())
        .await
        .map_err(|e| AppError::internal(format!("Failed to enqueue job: {}", e)))?;

    tracing::info!(job = job.name(), "Billing job queued");
    println!("Queued {} job.", job.name());
    Ok(())
}

/// Whether `jobs work` has created the apalis schema yet.
async fn queue_exists(db: &Database) -> AppResult<bool> {
    let row = db
        .connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

async fn list_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    if !queue_exists(&db).await? {
        println!("Job queue not initialized. Run 'jobs work' or 'jobs enqueue' first.");
        return Ok(());
    }

    let rows = db
        .connection()
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs GROUP BY status ORDER BY status",
        ))
        .await?;

    println!("\n=== Billing Job Queue ===");
    if rows.is_empty() {
        println!("No jobs.");
    }
    for row in rows {
        let status: String = row.try_get("", "status")?;
        let count: i64 = row.try_get("", "count")?;
        println!("{:<9} {}", format!("{}:", status), count);
    }
    println!("=========================\n");

    Ok(())
}

async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    if !queue_exists(&db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .connection()
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;

    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());
    Ok(())
}
