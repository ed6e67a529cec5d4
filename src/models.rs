use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{favorites, users};

/// Classification of a favorited catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Anime,
    Manga,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Anime => "anime",
            ContentKind::Manga => "manga",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anime" => Ok(ContentKind::Anime),
            "manga" => Ok(ContentKind::Manga),
            other => Err(format!("unknown content type '{other}', expected 'anime' or 'manga'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: String,
    pub content_type: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub score: f64,
    pub year: i32,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            content_id: model.content_id,
            content_type: model.content_type,
            title: model.title,
            image_url: model.image_url,
            score: model.score,
            year: model.year,
            added_at: model.added_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Identifies one favorite slot of a user: the content item and its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoriteKey {
    pub content_id: String,
    pub kind: ContentKind,
}

impl FavoriteKey {
    pub fn new(content_id: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            content_id: content_id.into(),
            kind,
        }
    }
}

/// Data for a favorite that may be created. Missing `score`/`year` are stored as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub key: FavoriteKey,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub score: Option<f64>,
    pub year: Option<i32>,
}

impl NewFavorite {
    pub fn new(key: FavoriteKey) -> Self {
        Self {
            key,
            title: None,
            image_url: None,
            score: None,
            year: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added(Favorite),
    Removed,
}

impl ToggleOutcome {
    pub fn is_favorite(&self) -> bool {
        matches!(self, ToggleOutcome::Added(_))
    }
}
