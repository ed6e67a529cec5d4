use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{delete, get, post},
};
use serde_json::Value;

use crate::{
    dto::favorites::{
        FavoriteActionResponse, FavoriteKeyQuery, FavoritesPage, FavoritesPageQuery,
        ToggleFavoriteRequest, parse_content_kind, parse_favorite_key, parse_toggle_request,
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::{ToggleOutcome, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites_page))
        .route("/toggle", post(toggle_favorite))
        .route("/remove", delete(remove_favorite))
        .route("/check", get(check_favorite))
}

async fn resolve_user(state: &AppState, principal: Option<Principal>) -> AppResult<User> {
    let principal = principal.ok_or(AppError::NotAuthenticated)?;
    state.users.resolve(&principal).await
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    params(
        ("contentType" = Option<String>, Query, description = "Only list 'anime' or 'manga'")
    ),
    responses(
        (status = 200, description = "Favorites page data", body = ApiResponse<FavoritesPage>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn favorites_page(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<FavoritesPageQuery>,
) -> AppResult<Json<ApiResponse<FavoritesPage>>> {
    let user = state.users.resolve(&principal).await?;

    let (favorites, total_favorites) = match query.content_type.as_deref() {
        Some(raw) => {
            let kind = parse_content_kind(Some(raw))?;
            (
                state.favorites.list_by_kind(&user, kind).await?,
                state.favorites.count_by_kind(&user, kind).await?,
            )
        }
        None => (
            state.favorites.list(&user).await?,
            state.favorites.count(&user).await?,
        ),
    };

    let data = FavoritesPage {
        favorites,
        total_favorites,
        username: user.username,
    };

    Ok(Json(ApiResponse::success(
        "OK",
        data,
        Some(Meta::with_total(total_favorites)),
    )))
}

#[utoipa::path(
    post,
    path = "/api/favorites/toggle",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Toggle result; failures carry success = false", body = FavoriteActionResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    principal: Option<Principal>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Json<FavoriteActionResponse> {
    let result: AppResult<ToggleOutcome> = async {
        let user = resolve_user(&state, principal).await?;
        let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let item = parse_toggle_request(&payload)?;
        state.favorites.toggle(&user, item).await
    }
    .await;

    match result {
        Ok(outcome) => {
            if let ToggleOutcome::Added(favorite) = &outcome {
                tracing::debug!(favorite_id = %favorite.id, "toggle added favorite");
            }
            Json(FavoriteActionResponse::toggled(&outcome))
        }
        Err(err) => {
            tracing::warn!(error = %err, "favorite toggle failed");
            Json(FavoriteActionResponse::failure(format!(
                "Could not process the request: {}",
                err.user_message()
            )))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/favorites/remove",
    params(
        ("contentId" = String, Query, description = "Catalog item id"),
        ("contentType" = String, Query, description = "'anime' or 'manga'")
    ),
    responses(
        (status = 200, description = "Remove result; failures carry success = false", body = FavoriteActionResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    principal: Option<Principal>,
    query: Result<Query<FavoriteKeyQuery>, QueryRejection>,
) -> Json<FavoriteActionResponse> {
    let result: AppResult<u64> = async {
        let user = resolve_user(&state, principal).await?;
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let key = parse_favorite_key(&query)?;
        state.favorites.remove(&user, &key).await
    }
    .await;

    match result {
        Ok(_) => Json(FavoriteActionResponse::removed()),
        Err(err) => {
            tracing::warn!(error = %err, "favorite remove failed");
            Json(FavoriteActionResponse::failure(format!(
                "Could not remove the favorite: {}",
                err.user_message()
            )))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/favorites/check",
    params(
        ("contentId" = String, Query, description = "Catalog item id"),
        ("contentType" = String, Query, description = "'anime' or 'manga'")
    ),
    responses(
        (status = 200, description = "Whether the item is a favorite of the caller", body = FavoriteActionResponse)
    ),
    tag = "Favorites"
)]
pub async fn check_favorite(
    State(state): State<AppState>,
    principal: Option<Principal>,
    query: Result<Query<FavoriteKeyQuery>, QueryRejection>,
) -> Json<FavoriteActionResponse> {
    let Some(principal) = principal else {
        return Json(FavoriteActionResponse::check_failure(
            AppError::NotAuthenticated.to_string(),
        ));
    };

    let result: AppResult<bool> = async {
        let user = state.users.resolve(&principal).await?;
        let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
        let key = parse_favorite_key(&query)?;
        state.favorites.is_favorite(&user, &key).await
    }
    .await;

    match result {
        Ok(is_favorite) => Json(FavoriteActionResponse::checked(is_favorite)),
        Err(err) => {
            tracing::warn!(error = %err, "favorite check failed");
            Json(FavoriteActionResponse::check_failure(format!(
                "Server error: {}",
                err.user_message()
            )))
        }
    }
}
