use sea_orm_migration::prelude::*;

use super::m20251001_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Favorites::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Favorites::UserId).uuid().not_null())
                    .col(ColumnDef::new(Favorites::ContentId).string().not_null())
                    .col(ColumnDef::new(Favorites::ContentType).string_len(16).not_null())
                    .col(ColumnDef::new(Favorites::Title).string().null())
                    .col(ColumnDef::new(Favorites::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(Favorites::Score)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Favorites::Year).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Favorites::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Favorites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_user")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (user, content item, kind); the service relies on this
        // to resolve concurrent inserts.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_favorites_user_content")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::ContentId)
                    .col(Favorites::ContentType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_user_added_at")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::AddedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    ContentId,
    ContentType,
    Title,
    ImageUrl,
    Score,
    Year,
    AddedAt,
    UpdatedAt,
}
