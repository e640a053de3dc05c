//! Create login audit table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginAudit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginAudit::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoginAudit::UserId).string_len(32))
                    .col(ColumnDef::new(LoginAudit::PhoneEncrypted).text())
                    .col(ColumnDef::new(LoginAudit::EpicEncrypted).text())
                    .col(ColumnDef::new(LoginAudit::IpHash).string_len(64))
                    .col(ColumnDef::new(LoginAudit::Success).boolean().not_null())
                    .col(
                        ColumnDef::new(LoginAudit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id + created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_login_audit_user_id_created_at")
                    .table(LoginAudit::Table)
                    .col(LoginAudit::UserId)
                    .col(LoginAudit::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginAudit::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LoginAudit {
    Table,
    Id,
    UserId,
    PhoneEncrypted,
    EpicEncrypted,
    IpHash,
    Success,
    CreatedAt,
}
