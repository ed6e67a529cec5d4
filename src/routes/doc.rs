use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        favorites::{FavoriteActionResponse, FavoritesPage, ToggleFavoriteRequest},
    },
    models::{ContentKind, Favorite, User},
    response::{ApiResponse, Meta},
    routes::{auth, favorites, health, pages},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        favorites::favorites_page,
        favorites::toggle_favorite,
        favorites::remove_favorite,
        favorites::check_favorite,
        pages::dashboard,
        pages::catalog_anime,
        pages::catalog_manga
    ),
    components(
        schemas(
            User,
            Favorite,
            ContentKind,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ToggleFavoriteRequest,
            FavoriteActionResponse,
            FavoritesPage,
            pages::PageContext,
            Meta,
            ApiResponse<User>,
            ApiResponse<FavoritesPage>,
            ApiResponse<LoginResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Favorites", description = "Per-user anime and manga favorites"),
        (name = "Pages", description = "Dashboard and catalog page data"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
