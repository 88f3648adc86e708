//! Billing background job.
//!
//! Rent generation and overdue marking, queued in Postgres and run by the
//! `jobs work` worker. Both are idempotent, so a retried job is harmless.

use std::sync::Arc;

use apalis::prelude::Data;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::GenerateMonthlyBills;
use crate::errors::AppError;
use crate::services::BillService;

/// Billing job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BillingJob {
    /// Bill a month's rent; `None` fields mean the month the job runs in
    GenerateMonthly {
        year: Option<i32>,
        month: Option<u32>,
    },
    MarkOverdue,
}

impl BillingJob {
    pub fn name(&self) -> &'static str {
        match self {
            BillingJob::GenerateMonthly { .. } => "generate-monthly",
            BillingJob::MarkOverdue => "mark-overdue",
        }
    }

    /// Run against `bills` as of `today`.
    pub async fn run(&self, bills: &dyn BillService, today: NaiveDate) -> Result<(), AppError> {
        match *self {
            BillingJob::GenerateMonthly { year, month } => {
                let summary = bills
                    .generate_monthly(GenerateMonthlyBills { year, month })
                    .await?;
                tracing::info!(
                    period = %summary.period,
                    created = summary.created,
                    skipped = summary.skipped,
                    "Rent generation job finished"
                );
            }
            BillingJob::MarkOverdue => {
                let changed = bills.mark_overdue(today).await?;
                tracing::info!(changed, %today, "Overdue marking job finished");
            }
        }
        Ok(())
    }
}

/// Worker entry point.
pub async fn billing_job_handler(
    job: BillingJob,
    bills: Data<Arc<dyn BillService>>,
) -> Result<(), AppError> {
    tracing::info!(job = job.name(), "Processing billing job");

    let result = job.run(&**bills, Utc::now().date_naive()).await;
    if let Err(e) = &result {
        tracing::error!(job = job.name(), error = %e, "Billing job failed");
    }
    result
}
