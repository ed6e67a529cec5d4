use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{ContentKind, Favorite, FavoriteKey, NewFavorite, ToggleOutcome},
};

pub const ADDED_MESSAGE: &str = "Added to favorites";
pub const REMOVED_MESSAGE: &str = "Removed from favorites";

#[derive(Debug, Error, PartialEq)]
pub enum FavoriteRequestError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    Missing(&'static str),

    #[error("field '{field}' is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<FavoriteRequestError> for AppError {
    fn from(err: FavoriteRequestError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Body of `POST /favorites/toggle`. Documentation only; the handler parses the
/// raw JSON with [`parse_toggle_request`].
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub content_id: String,
    pub content_type: ContentKind,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub score: Option<f64>,
    pub year: Option<i32>,
}

/// Query of `/favorites/check` and `/favorites/remove`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteKeyQuery {
    pub content_id: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPageQuery {
    pub content_type: Option<String>,
}

/// Reply of the favorites JSON endpoints. Failures are reported here with
/// `success: false` instead of an error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FavoriteActionResponse {
    pub fn toggled(outcome: &ToggleOutcome) -> Self {
        let is_favorite = outcome.is_favorite();
        let message = if is_favorite { ADDED_MESSAGE } else { REMOVED_MESSAGE };
        Self {
            success: true,
            is_favorite: Some(is_favorite),
            message: Some(message.to_owned()),
        }
    }

    pub fn removed() -> Self {
        Self {
            success: true,
            is_favorite: None,
            message: Some(REMOVED_MESSAGE.to_owned()),
        }
    }

    pub fn checked(is_favorite: bool) -> Self {
        Self {
            success: true,
            is_favorite: Some(is_favorite),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            is_favorite: None,
            message: Some(message.into()),
        }
    }

    pub fn check_failure(message: impl Into<String>) -> Self {
        Self {
            is_favorite: Some(false),
            ..Self::failure(message)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesPage {
    pub favorites: Vec<Favorite>,
    pub total_favorites: u64,
    pub username: String,
}

pub fn parse_content_kind(raw: Option<&str>) -> Result<ContentKind, FavoriteRequestError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FavoriteRequestError::Missing("contentType"))?;
    raw.parse().map_err(|reason| FavoriteRequestError::Invalid {
        field: "contentType",
        reason,
    })
}

pub fn parse_favorite_key(query: &FavoriteKeyQuery) -> Result<FavoriteKey, FavoriteRequestError> {
    let content_id = query
        .content_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FavoriteRequestError::Missing("contentId"))?;
    let kind = parse_content_kind(query.content_type.as_deref())?;
    Ok(FavoriteKey::new(content_id, kind))
}

/// Validates a raw toggle payload.
///
/// `contentId` may be a string or an integer; `score` and `year` may be numbers
/// or numeric strings and are left unset when absent or null.
pub fn parse_toggle_request(payload: &Value) -> Result<NewFavorite, FavoriteRequestError> {
    let body = payload.as_object().ok_or(FavoriteRequestError::NotAnObject)?;

    let content_id = match field(body, "contentId") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_owned(),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        Some(Value::String(_)) | None => return Err(FavoriteRequestError::Missing("contentId")),
        Some(_) => return Err(invalid("contentId", "expected a string")),
    };
    let kind = match field(body, "contentType") {
        Some(Value::String(s)) => parse_content_kind(Some(s.as_str()))?,
        None => return Err(FavoriteRequestError::Missing("contentType")),
        Some(_) => return Err(invalid("contentType", "expected a string")),
    };

    Ok(NewFavorite {
        key: FavoriteKey::new(content_id, kind),
        title: optional_string(body, "title")?,
        image_url: optional_string(body, "imageUrl")?,
        score: optional_score(body)?,
        year: optional_year(body)?,
    })
}

/// Present and not null.
fn field<'a>(body: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    body.get(name).filter(|v| !v.is_null())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> FavoriteRequestError {
    FavoriteRequestError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn optional_string(
    body: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, FavoriteRequestError> {
    match field(body, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(name, "expected a string")),
    }
}

fn optional_score(body: &Map<String, Value>) -> Result<Option<f64>, FavoriteRequestError> {
    let score = match field(body, "score") {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match score {
        Some(score) if score.is_finite() => Ok(Some(score)),
        _ => Err(invalid("score", "expected a number")),
    }
}

fn optional_year(body: &Map<String, Value>) -> Result<Option<i32>, FavoriteRequestError> {
    let year = match field(body, "year") {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        Some(_) => None,
    };
    year.map(Some)
        .ok_or_else(|| invalid("year", "expected an integer"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn toggle_request_defaults_missing_score_and_year() {
        let parsed = parse_toggle_request(&json!({
            "contentId": "123",
            "contentType": "anime",
            "title": "Naruto",
            "imageUrl": null
        }))
        .unwrap();

        assert_eq!(parsed.key, FavoriteKey::new("123", ContentKind::Anime));
        assert_eq!(parsed.title.as_deref(), Some("Naruto"));
        assert_eq!(parsed.image_url, None);
        assert_eq!(parsed.score, None);
        assert_eq!(parsed.year, None);
    }

    #[test]
    fn toggle_request_accepts_numeric_strings_and_integer_ids() {
        let parsed = parse_toggle_request(&json!({
            "contentId": 456,
            "contentType": "Manga",
            "score": "8.5",
            "year": "2002"
        }))
        .unwrap();

        assert_eq!(parsed.key, FavoriteKey::new("456", ContentKind::Manga));
        assert_eq!(parsed.score, Some(8.5));
        assert_eq!(parsed.year, Some(2002));
    }

    #[test]
    fn toggle_request_rejects_bad_payloads() {
        assert_eq!(
            parse_toggle_request(&json!([1, 2])),
            Err(FavoriteRequestError::NotAnObject)
        );
        assert_eq!(
            parse_toggle_request(&json!({ "contentType": "anime" })),
            Err(FavoriteRequestError::Missing("contentId"))
        );
        assert!(matches!(
            parse_toggle_request(&json!({ "contentId": "1", "contentType": "novel" })),
            Err(FavoriteRequestError::Invalid { field: "contentType", .. })
        ));
        assert!(matches!(
            parse_toggle_request(&json!({ "contentId": "1", "contentType": "anime", "year": "soon" })),
            Err(FavoriteRequestError::Invalid { field: "year", .. })
        ));
    }

    #[test]
    fn key_query_requires_both_params() {
        let query = FavoriteKeyQuery {
            content_id: Some("1".into()),
            content_type: None,
        };
        assert_eq!(
            parse_favorite_key(&query),
            Err(FavoriteRequestError::Missing("contentType"))
        );
    }

    #[test]
    fn failure_replies_omit_is_favorite_except_for_check() {
        let failure = serde_json::to_value(FavoriteActionResponse::failure("boom")).unwrap();
        assert_eq!(failure, json!({ "success": false, "message": "boom" }));

        let check = serde_json::to_value(FavoriteActionResponse::check_failure("Not authenticated")).unwrap();
        assert_eq!(
            check,
            json!({ "success": false, "isFavorite": false, "message": "Not authenticated" })
        );
    }
}
