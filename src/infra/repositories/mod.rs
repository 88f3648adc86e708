//! Repository layer - Data access abstraction
//!
//! Each aggregate gets an `async_trait` repository (mockable in tests) and a
//! SeaORM-backed store.

mod bill_repository;
mod directory;
pub(crate) mod entities;
mod maintenance_repository;
mod payment_repository;
mod unit_repository;
mod user_repository;

pub use bill_repository::{BillQuery, BillRepository, BillStats, BillStore};
pub use maintenance_repository::{MaintenanceRepository, MaintenanceStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use unit_repository::{UnitRepository, UnitStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use bill_repository::MockBillRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use maintenance_repository::MockMaintenanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use unit_repository::MockUnitRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
