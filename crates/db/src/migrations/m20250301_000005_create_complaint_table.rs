//! Create complaint table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Complaint::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Complaint::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Complaint::Description).text().not_null())
                    .col(ColumnDef::new(Complaint::Location).string_len(512))
                    .col(ColumnDef::new(Complaint::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Complaint::Priority).string_len(8).not_null())
                    .col(ColumnDef::new(Complaint::AssignedTo).string_len(32))
                    .col(ColumnDef::new(Complaint::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Complaint::ResolutionNotes).text())
                    .col(ColumnDef::new(Complaint::ResolutionPhoto).string_len(1024))
                    .col(ColumnDef::new(Complaint::ResolvedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Complaint::ApprovedByAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Complaint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Complaint::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_status")
                    .table(Complaint::Table)
                    .col(Complaint::Status)
                    .to_owned(),
            )
            .await?;

        // Index: assigned_to (volunteer worklist)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_assigned_to")
                    .table(Complaint::Table)
                    .col(Complaint::AssignedTo)
                    .to_owned(),
            )
            .await?;

        // Index: created_by
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_created_by")
                    .table(Complaint::Table)
                    .col(Complaint::CreatedBy)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
    Title,
    Description,
    Location,
    Status,
    Priority,
    AssignedTo,
    CreatedBy,
    ResolutionNotes,
    ResolutionPhoto,
    ResolvedAt,
    ApprovedByAdmin,
    CreatedAt,
    UpdatedAt,
}
