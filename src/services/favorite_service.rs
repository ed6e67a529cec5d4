use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    entity::favorites::ActiveModel as FavoriteActive,
    error::{AppError, AppResult},
    models::{ContentKind, Favorite, FavoriteKey, NewFavorite, ToggleOutcome, User},
    repositories::{self, favorites as store},
};

/// Per-user favorites over the record store.
///
/// `add`, `remove` and `toggle` each run in one transaction; the read methods
/// are single statements.
#[derive(Clone)]
pub struct FavoriteService {
    orm: DatabaseConnection,
}

impl FavoriteService {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub async fn list(&self, user: &User) -> AppResult<Vec<Favorite>> {
        let rows = store::find_all_by_user(&self.orm, user.id).await?;
        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    pub async fn list_by_kind(&self, user: &User, kind: ContentKind) -> AppResult<Vec<Favorite>> {
        let rows = store::find_all_by_user_and_kind(&self.orm, user.id, kind).await?;
        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    pub async fn count(&self, user: &User) -> AppResult<u64> {
        Ok(store::count_by_user(&self.orm, user.id).await?)
    }

    pub async fn count_by_kind(&self, user: &User, kind: ContentKind) -> AppResult<u64> {
        Ok(store::count_by_user_and_kind(&self.orm, user.id, kind).await?)
    }

    pub async fn is_favorite(&self, user: &User, key: &FavoriteKey) -> AppResult<bool> {
        Ok(store::exists(&self.orm, user.id, key).await?)
    }

    /// Idempotent create: an existing favorite is returned untouched, even
    /// when `item` carries different display metadata.
    pub async fn add(&self, user: &User, item: NewFavorite) -> AppResult<Favorite> {
        let txn = self.orm.begin().await?;
        let favorite = add_in(&txn, user.id, item).await?;
        txn.commit().await?;
        Ok(favorite)
    }

    /// Idempotent delete. Returns how many rows went away (0 or 1).
    pub async fn remove(&self, user: &User, key: &FavoriteKey) -> AppResult<u64> {
        let txn = self.orm.begin().await?;
        let removed = store::delete_one(&txn, user.id, key).await?;
        txn.commit().await?;
        tracing::debug!(user_id = %user.id, content_id = %key.content_id, kind = %key.kind, removed, "favorite removed");
        Ok(removed)
    }

    /// Flips the favorite state of `item.key`: removes it when present,
    /// creates it otherwise.
    pub async fn toggle(&self, user: &User, item: NewFavorite) -> AppResult<ToggleOutcome> {
        let txn = self.orm.begin().await?;
        let outcome = if store::exists(&txn, user.id, &item.key).await? {
            store::delete_one(&txn, user.id, &item.key).await?;
            ToggleOutcome::Removed
        } else {
            ToggleOutcome::Added(add_in(&txn, user.id, item).await?)
        };
        txn.commit().await?;
        Ok(outcome)
    }
}

async fn add_in(txn: &DatabaseTransaction, user_id: Uuid, item: NewFavorite) -> AppResult<Favorite> {
    if let Some(existing) = store::find_one(txn, user_id, &item.key).await? {
        return Ok(existing.into());
    }

    let NewFavorite {
        key,
        title,
        image_url,
        score,
        year,
    } = item;
    let now = Utc::now();
    let active = FavoriteActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        content_id: Set(key.content_id.clone()),
        content_type: Set(key.kind.as_str().to_owned()),
        title: Set(title),
        image_url: Set(image_url),
        score: Set(score.unwrap_or(0.0)),
        year: Set(year.unwrap_or(0)),
        added_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    // The insert runs in a savepoint so a lost race against a concurrent add
    // leaves the outer transaction usable for the re-read.
    let savepoint = txn.begin().await?;
    match store::insert(&savepoint, active).await {
        Ok(model) => {
            savepoint.commit().await?;
            tracing::info!(%user_id, content_id = %key.content_id, kind = %key.kind, "favorite added");
            Ok(model.into())
        }
        Err(err) if repositories::is_unique_violation(&err) => {
            savepoint.rollback().await?;
            tracing::debug!(%user_id, content_id = %key.content_id, kind = %key.kind, "favorite already present, concurrent insert");
            store::find_one(txn, user_id, &key)
                .await?
                .map(Favorite::from)
                .ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "favorite {} ({}) conflicted on insert but could not be read back",
                        key.content_id,
                        key.kind
                    ))
                })
        }
        Err(err) => Err(err.into()),
    }
}
