//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::Name).string_len(256).not_null())
                    .col(ColumnDef::new(User::Email).string_len(320).not_null())
                    .col(ColumnDef::new(User::Mobile).string_len(20))
                    .col(ColumnDef::new(User::Role).string_len(16).not_null())
                    .col(ColumnDef::new(User::PasswordHash).string_len(128).not_null())
                    .col(ColumnDef::new(User::AvatarUrl).string_len(1024))
                    .col(ColumnDef::new(User::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(User::ApprovedBy).string_len(32))
                    .col(ColumnDef::new(User::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::LastLoginAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(User::Points).integer().not_null().default(0))
                    .col(ColumnDef::new(User::Level).integer().not_null().default(1))
                    .col(ColumnDef::new(User::TasksCompleted).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(User::ComplaintsResolved)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(User::Collaborations).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: role (role-scoped listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        // Index: points (leaderboard)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_points")
                    .table(User::Table)
                    .col(User::Points)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    Mobile,
    Role,
    PasswordHash,
    AvatarUrl,
    IsApproved,
    ApprovedBy,
    ApprovedAt,
    LastLoginAt,
    IsActive,
    Points,
    Level,
    TasksCompleted,
    ComplaintsResolved,
    Collaborations,
    CreatedAt,
    UpdatedAt,
}
