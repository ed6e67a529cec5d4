//! Page contexts for the dashboard and the catalog views.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    middleware::auth::Principal,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const GUEST_USERNAME: &str = "Guest";

#[derive(Debug, Serialize, ToSchema)]
pub struct PageContext {
    pub page: String,
    pub username: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/catalog/anime", get(catalog_anime))
        .route("/catalog/manga", get(catalog_manga))
}

async fn page_context(
    state: &AppState,
    principal: Option<Principal>,
    page: &str,
) -> AppResult<Json<ApiResponse<PageContext>>> {
    let username = match principal {
        Some(principal) => state.users.resolve(&principal).await?.username,
        None => GUEST_USERNAME.to_owned(),
    };

    let data = PageContext {
        page: page.to_owned(),
        username,
    };
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/pages/dashboard",
    responses(
        (status = 200, description = "Dashboard context", body = ApiResponse<PageContext>),
        (status = 404, description = "User not found")
    ),
    tag = "Pages"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> AppResult<Json<ApiResponse<PageContext>>> {
    page_context(&state, principal, "dashboard").await
}

#[utoipa::path(
    get,
    path = "/api/pages/catalog/anime",
    responses(
        (status = 200, description = "Anime catalog context", body = ApiResponse<PageContext>),
        (status = 404, description = "User not found")
    ),
    tag = "Pages"
)]
pub async fn catalog_anime(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> AppResult<Json<ApiResponse<PageContext>>> {
    page_context(&state, principal, "catalogAnime").await
}

#[utoipa::path(
    get,
    path = "/api/pages/catalog/manga",
    responses(
        (status = 200, description = "Manga catalog context", body = ApiResponse<PageContext>),
        (status = 404, description = "User not found")
    ),
    tag = "Pages"
)]
pub async fn catalog_manga(
    State(state): State<AppState>,
    principal: Option<Principal>,
) -> AppResult<Json<ApiResponse<PageContext>>> {
    page_context(&state, principal, "catalogManga").await
}
