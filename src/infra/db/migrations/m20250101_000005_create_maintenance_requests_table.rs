//! Migration: Create maintenance_requests table.

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
                    .table(MaintenanceRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::TenantId).uuid().not_null())
                    .col(
                        ColumnDef::new(MaintenanceRequests::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::Description).text().not_null())
                    .col(
                        ColumnDef::new(MaintenanceRequests::Priority)
                            .string_len(20)
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(MaintenanceRequests::StaffNotes).text().null())
                    .col(
                        ColumnDef::new(MaintenanceRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MaintenanceRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_tenant")
                            .from(MaintenanceRequests::Table, MaintenanceRequests::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_tenant_status")
                    .table(MaintenanceRequests::Table)
                    .col(MaintenanceRequests::TenantId)
                    .col(MaintenanceRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MaintenanceRequests {
    Table,
    Id,
    TenantId,
    Title,
    Description,
    Priority,
    Status,
    StaffNotes,
    CreatedAt,
    UpdatedAt,
}
