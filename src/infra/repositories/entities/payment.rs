//! Payment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::user::corrupt_column;
use crate::domain::Payment;
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bill_id: Uuid,
    pub amount_cents: i64,
    pub method: String,
    pub transaction_id: String,
    pub paymongo_link_id: Option<String>,
    pub checkout_url: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bill::Entity",
        from = "Column::BillId",
        to = "super::bill::Column::Id",
        on_delete = "Restrict"
    )]
    Bill,
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Payment {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(Payment {
            id: model.id,
            bill_id: model.bill_id,
            amount_cents: model.amount_cents,
            method: model.method.parse().map_err(corrupt_column)?,
            transaction_id: model.transaction_id,
            paymongo_link_id: model.paymongo_link_id,
            checkout_url: model.checkout_url,
            status: model.status.parse().map_err(corrupt_column)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
