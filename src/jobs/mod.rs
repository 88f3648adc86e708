//! Background jobs processed by the apalis worker.

mod billing_job;

pub use billing_job::{billing_job_handler, BillingJob};
