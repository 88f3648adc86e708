//! Dashboard figures.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::bill::BillView;

/// A count with the summed amount in centavos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AmountStat {
    pub count: u64,
    pub total_cents: i64,
}

/// Building-wide figures for managers and staff
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffDashboard {
    pub total_units: u64,
    pub occupied_units: u64,
    pub available_units: u64,
    pub total_tenants: u64,
    pub total_bills: u64,
    pub unpaid_bills: AmountStat,
    pub completed_payments: AmountStat,
    pub pending_maintenance: u64,
    pub recent_bills: Vec<BillView>,
}

/// A tenant's own figures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TenantDashboard {
    pub unpaid_bills: AmountStat,
    pub completed_payments: AmountStat,
    pub pending_maintenance: u64,
    pub recent_bills: Vec<BillView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Dashboard {
    Staff(StaffDashboard),
    Tenant(TenantDashboard),
}
