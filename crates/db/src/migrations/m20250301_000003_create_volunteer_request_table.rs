//! Create volunteer request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VolunteerRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VolunteerRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VolunteerRequest::Name).string_len(256).not_null())
                    .col(ColumnDef::new(VolunteerRequest::Email).string_len(320).not_null())
                    .col(ColumnDef::new(VolunteerRequest::Mobile).string_len(20))
                    .col(
                        ColumnDef::new(VolunteerRequest::PasswordHash)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VolunteerRequest::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(VolunteerRequest::Message).text())
                    .col(ColumnDef::new(VolunteerRequest::Status).string_len(16).not_null())
                    .col(ColumnDef::new(VolunteerRequest::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(VolunteerRequest::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(VolunteerRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status + created_at (pending queue, newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_request_status_created_at")
                    .table(VolunteerRequest::Table)
                    .col(VolunteerRequest::Status)
                    .col(VolunteerRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: email (duplicate intake check)
        manager
            .create_index(
                Index::create()
                    .name("idx_volunteer_request_email")
                    .table(VolunteerRequest::Table)
                    .col(VolunteerRequest::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VolunteerRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VolunteerRequest {
    Table,
    Id,
    Name,
    Email,
    Mobile,
    PasswordHash,
    AvatarUrl,
    Message,
    Status,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}
