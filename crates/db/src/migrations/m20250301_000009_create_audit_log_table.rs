//! Create audit log table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLog::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(AuditLog::ActorId).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLog::Action).string_len(128).not_null())
                    .col(ColumnDef::new(AuditLog::TargetKind).string_len(64))
                    .col(ColumnDef::new(AuditLog::TargetId).string_len(32))
                    .col(ColumnDef::new(AuditLog::Detail).json_binary())
                    .col(
                        ColumnDef::new(AuditLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: actor_id + created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_actor_id_created_at")
                    .table(AuditLog::Table)
                    .col(AuditLog::ActorId)
                    .col(AuditLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuditLog {
    Table,
    Id,
    ActorId,
    Action,
    TargetKind,
    TargetId,
    Detail,
    CreatedAt,
}
