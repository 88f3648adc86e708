//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_MANAGER, ROLE_STAFF, ROLE_TENANT};
use crate::errors::AppError;

use super::unit::Unit;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    Staff,
    Tenant,
}

impl UserRole {
    /// Manager or staff: people who run the building.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Staff)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, UserRole::Manager)
    }

    pub fn is_tenant(&self) -> bool {
        matches!(self, UserRole::Tenant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => ROLE_MANAGER,
            UserRole::Staff => ROLE_STAFF,
            UserRole::Tenant => ROLE_TENANT,
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_MANAGER => Ok(UserRole::Manager),
            ROLE_STAFF => Ok(UserRole::Staff),
            ROLE_TENANT => Ok(UserRole::Tenant),
            other => Err(AppError::validation(format!("Invalid role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    /// Unit the user lives in (tenants only)
    pub unit_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_tenant(&self) -> bool {
        self.role.is_tenant()
    }

    /// True when this user may see data belonging to `owner_id`.
    pub fn can_view(&self, owner_id: Uuid) -> bool {
        self.actor().can_view(owner_id)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
        }
    }
}

/// Who is acting on a request: enough to scope queries and check ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_manager(&self) -> bool {
        self.role.is_manager()
    }

    pub fn is_tenant(&self) -> bool {
        self.role.is_tenant()
    }

    pub fn can_view(&self, owner_id: Uuid) -> bool {
        self.is_staff() || self.id == owner_id
    }

    /// The tenant a listing is limited to: the actor itself for tenants,
    /// otherwise whatever the caller asked for.
    pub fn scope(&self, requested: Option<Uuid>) -> Option<Uuid> {
        if self.is_tenant() {
            Some(self.id)
        } else {
            requested
        }
    }
}

/// A user joined with the unit they occupy.
#[derive(Debug, Clone)]
pub struct UserWithUnit {
    pub user: User,
    pub unit: Option<Unit>,
}

/// Data required to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

/// Staff account creation request (manager only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "staff2@ancheta.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Maria Santos")]
    pub name: String,
    /// `manager` or `staff`; tenants are created through `/tenants`
    #[schema(example = "staff")]
    pub role: UserRole,
    #[schema(example = "09171234567")]
    pub phone: Option<String>,
}

/// Profile update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Juan Dela Cruz")]
    pub name: Option<String>,
    #[schema(example = "09181234567")]
    pub phone: Option<String>,
}

/// Query string for listing users
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserFilter {
    /// Only users with this role
    pub role: Option<UserRole>,
    /// Case-insensitive match on name or e-mail
    pub search: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "tenant@ancheta.com")]
    pub email: String,
    #[schema(example = "Juan Dela Cruz")]
    pub name: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub unit_id: Option<Uuid>,
    #[schema(example = "101")]
    pub unit_number: Option<String>,
    pub floor: Option<i32>,
    #[schema(example = "Building A")]
    pub building: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            phone: user.phone,
            unit_id: user.unit_id,
            unit_number: None,
            floor: None,
            building: None,
            created_at: user.created_at,
        }
    }
}

impl From<UserWithUnit> for UserResponse {
    fn from(row: UserWithUnit) -> Self {
        let mut response = UserResponse::from(row.user);
        if let Some(unit) = row.unit {
            response.unit_number = Some(unit.unit_number);
            response.floor = Some(unit.floor);
            response.building = Some(unit.building);
        }
        response
    }
}
