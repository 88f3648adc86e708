//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

/// Apartment management API server and maintenance tooling
#[derive(Parser, Debug)]
#[command(name = "apartment-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Load demo units, accounts and a first bill into an empty database
    Seed,

    /// Manage background billing jobs
    Jobs(JobsArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the billing worker
    Work,
    /// Show queue counts by status
    List,
    /// Remove failed jobs
    Clear,
    /// Queue a billing job
    Enqueue(EnqueueArgs),
}

#[derive(Parser, Debug)]
pub struct EnqueueArgs {
    pub job: JobKind,

    /// Billing year for `generate-monthly`; defaults to the current year
    #[arg(long)]
    pub year: Option<i32>,

    /// Billing month (1-12) for `generate-monthly`; defaults to the current month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    /// Bill the month's rent to every housed tenant
    GenerateMonthly,
    /// Flag unpaid bills past their due date
    MarkOverdue,
}
