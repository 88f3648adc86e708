//! Bill database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::user::corrupt_column;
use crate::domain::Bill;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub bill_type: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub due_date: Date,
    pub status: String,
    /// `YYYY-MM`, unique per tenant when set
    pub period: Option<String>,
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
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Bill {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Bill {
            id: model.id,
            tenant_id: model.tenant_id,
            bill_type: model.bill_type,
            amount_cents: model.amount_cents,
            description: model.description,
            due_date: model.due_date,
            status: model.status.parse().map_err(corrupt_column)?,
            period: model.period,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
