//! Favorite record store.
//!
//! Every function takes any connection, so callers can run them on the pool
//! or inside an open transaction.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::{
    entity::favorites::{ActiveModel, Column, Entity as Favorites, Model},
    models::{ContentKind, FavoriteKey},
};

fn key_condition(user_id: Uuid, key: &FavoriteKey) -> Condition {
    Condition::all()
        .add(Column::UserId.eq(user_id))
        .add(Column::ContentId.eq(key.content_id.as_str()))
        .add(Column::ContentType.eq(key.kind.as_str()))
}

/// Newest-added first.
pub async fn find_all_by_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Vec<Model>, DbErr> {
    Favorites::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::AddedAt)
        .all(conn)
        .await
}

pub async fn find_all_by_user_and_kind<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    kind: ContentKind,
) -> Result<Vec<Model>, DbErr> {
    Favorites::find()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user_id))
                .add(Column::ContentType.eq(kind.as_str())),
        )
        .order_by_desc(Column::AddedAt)
        .all(conn)
        .await
}

pub async fn find_one<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    key: &FavoriteKey,
) -> Result<Option<Model>, DbErr> {
    Favorites::find()
        .filter(key_condition(user_id, key))
        .one(conn)
        .await
}

pub async fn exists<C: ConnectionTrait>(conn: &C, user_id: Uuid, key: &FavoriteKey) -> Result<bool, DbErr> {
    let matches = Favorites::find()
        .filter(key_condition(user_id, key))
        .count(conn)
        .await?;
    Ok(matches > 0)
}

/// Fails with a unique-constraint violation when the key is already taken;
/// see [`super::is_unique_violation`].
pub async fn insert<C: ConnectionTrait>(conn: &C, favorite: ActiveModel) -> Result<Model, DbErr> {
    favorite.insert(conn).await
}

/// Returns the number of rows removed, 0 when nothing matched.
pub async fn delete_one<C: ConnectionTrait>(conn: &C, user_id: Uuid, key: &FavoriteKey) -> Result<u64, DbErr> {
    let result = Favorites::delete_many()
        .filter(key_condition(user_id, key))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_by_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<u64, DbErr> {
    Favorites::find()
        .filter(Column::UserId.eq(user_id))
        .count(conn)
        .await
}

pub async fn count_by_user_and_kind<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    kind: ContentKind,
) -> Result<u64, DbErr> {
    Favorites::find()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user_id))
                .add(Column::ContentType.eq(kind.as_str())),
        )
        .count(conn)
        .await
}
