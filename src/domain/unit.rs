//! Apartment units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

string_enum! {
    /// Occupancy of a unit, derived from tenant assignment.
    pub enum UnitStatus("unit status") {
        Available => "available",
        Occupied => "occupied",
    }
}

string_enum! {
    pub enum MaintenanceStatus("maintenance status") {
        None => "none",
        Pending => "pending",
        InProgress => "in_progress",
    }
}

/// Unit domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Unit {
    pub id: Uuid,
    #[schema(example = "101")]
    pub unit_number: String,
    pub floor: i32,
    #[schema(example = "Building A")]
    pub building: String,
    #[schema(example = "Studio")]
    pub unit_type: Option<String>,
    /// Monthly rent in centavos
    #[schema(example = 500000)]
    pub rent_cents: i64,
    pub status: UnitStatus,
    pub maintenance_status: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }
}

/// Tenant living in a unit, as shown on unit listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitOccupant {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Unit with its occupant
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitResponse {
    #[serde(flatten)]
    pub unit: Unit,
    pub tenant: Option<UnitOccupant>,
}

/// Unit creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUnit {
    #[validate(length(min = 1, message = "Unit number is required"))]
    #[schema(example = "401")]
    pub unit_number: String,
    #[schema(example = 4)]
    pub floor: i32,
    #[validate(length(min = 1, message = "Building is required"))]
    #[schema(example = "Building A")]
    pub building: String,
    #[schema(example = "2BR")]
    pub unit_type: Option<String>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    #[serde(default)]
    #[schema(example = 1000000)]
    pub rent_cents: i64,
    pub maintenance_status: Option<MaintenanceStatus>,
}

/// Unit update request; occupancy is not editable here
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUnit {
    #[validate(length(min = 1, message = "Unit number cannot be empty"))]
    pub unit_number: Option<String>,
    pub floor: Option<i32>,
    #[validate(length(min = 1, message = "Building cannot be empty"))]
    pub building: Option<String>,
    pub unit_type: Option<String>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_cents: Option<i64>,
    pub maintenance_status: Option<MaintenanceStatus>,
}

/// Query string for listing units
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UnitFilter {
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub status: Option<UnitStatus>,
}
