//! Create voter request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoterRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoterRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoterRequest::Name).string_len(256).not_null())
                    .col(ColumnDef::new(VoterRequest::Email).string_len(320).not_null())
                    .col(ColumnDef::new(VoterRequest::Mobile).string_len(20))
                    .col(
                        ColumnDef::new(VoterRequest::PasswordHash)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(VoterRequest::VoterIdNumber).string_len(32))
                    .col(ColumnDef::new(VoterRequest::Address).text())
                    .col(ColumnDef::new(VoterRequest::Ward).string_len(128))
                    .col(ColumnDef::new(VoterRequest::Area).string_len(128))
                    .col(ColumnDef::new(VoterRequest::Message).text())
                    .col(ColumnDef::new(VoterRequest::Status).string_len(16).not_null())
                    .col(ColumnDef::new(VoterRequest::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(VoterRequest::ReviewedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(VoterRequest::CreatedAt)
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
                    .name("idx_voter_request_status_created_at")
                    .table(VoterRequest::Table)
                    .col(VoterRequest::Status)
                    .col(VoterRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: email (duplicate intake check)
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_request_email")
                    .table(VoterRequest::Table)
                    .col(VoterRequest::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoterRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VoterRequest {
    Table,
    Id,
    Name,
    Email,
    Mobile,
    PasswordHash,
    VoterIdNumber,
    Address,
    Ward,
    Area,
    Message,
    Status,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}
