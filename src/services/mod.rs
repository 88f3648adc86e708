//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories behind `async_trait`
//! interfaces, reaching storage through the Unit of Work.

mod auth_service;
mod bill_service;
pub mod container;
mod dashboard_service;
mod maintenance_service;
mod payment_service;
mod tenant_service;
mod unit_service;
mod user_service;

#[cfg(test)]
pub(crate) mod testing;

pub use container::{parallel, ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use bill_service::{BillManager, BillService};
pub use dashboard_service::{DashboardManager, DashboardService};
pub use maintenance_service::{MaintenanceManager, MaintenanceService};
pub use payment_service::{PaymentManager, PaymentService};
pub use tenant_service::{TenantManager, TenantService};
pub use unit_service::{UnitManager, UnitService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
