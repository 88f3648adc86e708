//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL connection, migrations and repositories
//! - Redis cache and rate-limit counters
//! - PayMongo payment-link client
//! - Unit of Work for repository access

pub mod cache;
pub mod db;
pub mod paymongo;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use paymongo::{PayMongoClient, PaymentGateway};
pub use repositories::{
    BillQuery, BillRepository, BillStats, BillStore, MaintenanceRepository, MaintenanceStore,
    PaymentRepository, PaymentStore, UnitRepository, UnitStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use paymongo::MockPaymentGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBillRepository, MockMaintenanceRepository, MockPaymentRepository, MockUnitRepository,
    MockUserRepository,
};
