//! Apartment management API
//!
//! Units, tenants, rent billing, PayMongo payments and maintenance requests
//! for a single apartment building, served over a JSON REST API.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve`, `migrate`, `seed` and `jobs`
//! - **config**: environment settings and constants
//! - **domain**: entities and pure rules (roles, billing periods, tenant e-mails)
//! - **services**: use cases behind `async_trait` interfaces
//! - **infra**: Postgres, Redis and the PayMongo client
//! - **api**: axum handlers, middleware and routes
//! - **jobs**: billing work for the background worker
//! - **errors**: centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! apartment-api migrate up
//! apartment-api seed
//! apartment-api serve --port 3000
//! apartment-api jobs enqueue generate-monthly
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;

pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::Cache;
