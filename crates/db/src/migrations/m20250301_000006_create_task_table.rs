//! Create task table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Task::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Task::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Task::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Task::Description).text().not_null())
                    .col(ColumnDef::new(Task::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Task::Priority).string_len(8).not_null())
                    .col(ColumnDef::new(Task::AssignedTo).string_len(32))
                    .col(ColumnDef::new(Task::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Task::DueDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Task::PointsReward).integer().not_null().default(10))
                    .col(ColumnDef::new(Task::CompletedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Task::Collaborators)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Task::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Task::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_task_status")
                    .table(Task::Table)
                    .col(Task::Status)
                    .to_owned(),
            )
            .await?;

        // Index: assigned_to (volunteer worklist)
        manager
            .create_index(
                Index::create()
                    .name("idx_task_assigned_to")
                    .table(Task::Table)
                    .col(Task::AssignedTo)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Task::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Task {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    AssignedTo,
    CreatedBy,
    DueDate,
    PointsReward,
    CompletedAt,
    Collaborators,
    CreatedAt,
    UpdatedAt,
}
