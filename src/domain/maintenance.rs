//! Maintenance requests filed by tenants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

string_enum! {
    pub enum Priority("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

string_enum! {
    pub enum MaintenanceState("maintenance request status") {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Maintenance request domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[schema(example = "Leaky faucet")]
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: MaintenanceState,
    pub staff_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request with tenant and unit details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceView {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub tenant_name: Option<String>,
    pub unit_number: Option<String>,
    pub building: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMaintenanceRequest {
    pub tenant_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

/// Maintenance request creation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Leaky faucet")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    #[schema(example = "Kitchen faucet drips all night")]
    pub description: String,
    pub priority: Option<Priority>,
    /// Required when staff file on a tenant's behalf; ignored for tenants
    pub tenant_id: Option<Uuid>,
}

/// Maintenance request update
///
/// Tenants may only change `title` and `description`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenanceRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<MaintenanceState>,
    pub staff_notes: Option<String>,
}

impl UpdateMaintenanceRequest {
    /// True when the update touches fields reserved for staff.
    pub fn has_staff_fields(&self) -> bool {
        self.priority.is_some() || self.status.is_some() || self.staff_notes.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct MaintenanceFilter {
    pub status: Option<MaintenanceState>,
    pub priority: Option<Priority>,
}
