//! Maintenance request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::user::corrupt_column;
use crate::domain::MaintenanceRequest;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub priority: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub staff_notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TenantId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MaintenanceRequest {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(MaintenanceRequest {
            id: model.id,
            tenant_id: model.tenant_id,
            title: model.title,
            description: model.description,
            priority: model.priority.parse().map_err(corrupt_column)?,
            status: model.status.parse().map_err(corrupt_column)?,
            staff_notes: model.staff_notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
