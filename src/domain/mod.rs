//! Domain layer - Core business entities and logic
//!
//! Residents, units, bills, payments and maintenance requests, plus the
//! pure rules around them (roles, billing periods, tenant login e-mails).
//! Nothing in here touches the database or the network.

/// Declares a closed set of lowercase string values stored as text columns.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        $vis enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(crate::errors::AppError::validation(format!(
                        "Invalid {}: {}",
                        $label, other
                    ))),
                }
            }
        }
    };
}

pub mod bill;
pub mod dashboard;
pub mod maintenance;
pub mod password;
pub mod payment;
pub mod tenant;
pub mod unit;
pub mod user;

pub use bill::{
    Bill, BillFilter, BillStatus, BillView, BillingPeriod, CreateBill, GenerateMonthlyBills,
    GenerationSummary, NewBill, RentCandidate, UpdateBill,
};
pub use dashboard::{AmountStat, Dashboard, StaffDashboard, TenantDashboard};
pub use maintenance::{
    CreateMaintenanceRequest, MaintenanceFilter, MaintenanceRequest, MaintenanceState,
    MaintenanceView, NewMaintenanceRequest, Priority, UpdateMaintenanceRequest,
};
pub use password::Password;
pub use payment::{
    CreatePaymentLink, NewPayment, NewPaymentLink, Payment, PaymentLink, PaymentLinkCreated,
    PaymentMethod, PaymentStatus, PaymentVerification, PaymentView, RecordPayment,
};
pub use tenant::{next_tenant_email, AssignUnit, CreateTenant, TenantCreated, TenantSummary};
pub use unit::{
    CreateUnit, MaintenanceStatus, Unit, UnitFilter, UnitOccupant, UnitResponse, UnitStatus,
    UpdateUnit,
};
pub use user::{
    Actor, CreateUser, NewUser, UpdateProfile, User, UserFilter, UserResponse, UserRole,
    UserWithUnit,
};
