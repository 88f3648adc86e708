//! Unit database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::user::corrupt_column;
use crate::domain::Unit;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_number: String,
    pub floor: i32,
    pub building: String,
    pub unit_type: Option<String>,
    pub rent_cents: i64,
    pub status: String,
    pub maintenance_status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    Tenants,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Unit {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Unit {
            id: model.id,
            unit_number: model.unit_number,
            floor: model.floor,
            building: model.building,
            unit_type: model.unit_type,
            rent_cents: model.rent_cents,
            status: model.status.parse().map_err(corrupt_column)?,
            maintenance_status: model.maintenance_status.parse().map_err(corrupt_column)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
