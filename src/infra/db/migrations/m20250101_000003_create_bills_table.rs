//! Migration: Create bills table.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bills::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bills::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Bills::BillType).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Bills::AmountCents)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Bills::AmountCents).gt(0)),
                    )
                    .col(ColumnDef::new(Bills::Description).text().null())
                    .col(ColumnDef::new(Bills::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(Bills::Status)
                            .string_len(20)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(ColumnDef::new(Bills::Period).string_len(7).null())
                    .col(
                        ColumnDef::new(Bills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bills::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_tenant")
                            .from(Bills::Table, Bills::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Generated rent: at most one bill per tenant per month.
        // NULL periods (manual bills) never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_bills_tenant_period")
                    .table(Bills::Table)
                    .col(Bills::TenantId)
                    .col(Bills::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bills_status_due_date")
                    .table(Bills::Table)
                    .col(Bills::Status)
                    .col(Bills::DueDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Bills {
    Table,
    Id,
    TenantId,
    BillType,
    AmountCents,
    Description,
    DueDate,
    Status,
    Period,
    CreatedAt,
    UpdatedAt,
}
