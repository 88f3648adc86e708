//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod bill;
pub mod maintenance_request;
pub mod payment;
pub mod unit;
pub mod user;
