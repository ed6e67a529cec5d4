use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::{
    middleware::auth::AuthKeys,
    services::{auth_service::AuthService, favorite_service::FavoriteService, user_service::UserService},
};

/// Composition root: every service the router needs, built once from a
/// connection and the signing keys.
#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub keys: AuthKeys,
    pub users: UserService,
    pub auth: AuthService,
    pub favorites: FavoriteService,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, keys: AuthKeys) -> Self {
        let users = UserService::new(orm.clone());
        let auth = AuthService::new(users.clone(), keys.clone());
        let favorites = FavoriteService::new(orm.clone());
        Self {
            orm,
            keys,
            users,
            auth,
            favorites,
        }
    }
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
