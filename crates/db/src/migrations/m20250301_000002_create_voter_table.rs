//! Create voter table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Voter::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Voter::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Voter::UserId).string_len(32))
                    .col(ColumnDef::new(Voter::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Voter::Phone).string_len(20))
                    .col(ColumnDef::new(Voter::Address).text())
                    .col(ColumnDef::new(Voter::Ward).string_len(128))
                    .col(ColumnDef::new(Voter::Booth).string_len(128))
                    .col(ColumnDef::new(Voter::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Voter::Notes).text())
                    .col(
                        ColumnDef::new(Voter::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Voter::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: ward + booth (the common list filters)
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_ward_booth")
                    .table(Voter::Table)
                    .col(Voter::Ward)
                    .col(Voter::Booth)
                    .to_owned(),
            )
            .await?;

        // Index: category
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_category")
                    .table(Voter::Table)
                    .col(Voter::Category)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (link from account)
        manager
            .create_index(
                Index::create()
                    .name("idx_voter_user_id")
                    .table(Voter::Table)
                    .col(Voter::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Voter::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Voter {
    Table,
    Id,
    UserId,
    Name,
    Phone,
    Address,
    Ward,
    Booth,
    Category,
    Notes,
    CreatedAt,
    UpdatedAt,
}
