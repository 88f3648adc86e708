//! Migration: Create units table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Units::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Units::UnitNumber).string_len(20).not_null())
                    .col(ColumnDef::new(Units::Floor).integer().not_null())
                    .col(ColumnDef::new(Units::Building).string_len(100).not_null())
                    .col(ColumnDef::new(Units::UnitType).string_len(50).null())
                    .col(
                        ColumnDef::new(Units::RentCents)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Units::RentCents).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Units::Status)
                            .string_len(20)
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Units::MaintenanceStatus)
                            .string_len(20)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Units::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_units_number_building")
                    .table(Units::Table)
                    .col(Units::UnitNumber)
                    .col(Units::Building)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Units {
    Table,
    Id,
    UnitNumber,
    Floor,
    Building,
    UnitType,
    RentCents,
    Status,
    MaintenanceStatus,
    CreatedAt,
    UpdatedAt,
}
