//! HTTP request handlers.

pub mod auth_handler;
pub mod bill_handler;
pub mod dashboard_handler;
pub mod maintenance_handler;
pub mod payment_handler;
pub mod tenant_handler;
pub mod unit_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use bill_handler::bill_routes;
pub use dashboard_handler::{dashboard_routes, health};
pub use maintenance_handler::maintenance_routes;
pub use payment_handler::payment_routes;
pub use tenant_handler::tenant_routes;
pub use unit_handler::unit_routes;
pub use user_handler::user_routes;
