#![allow(dead_code)]

use mangaverse_api::{
    db::{create_orm_conn, run_migrations},
    dto::auth::RegisterRequest,
    middleware::auth::AuthKeys,
    models::User,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "Secret!Pass";

/// Fresh in-memory database with the schema applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, AuthKeys::new(TEST_SECRET, 1)))
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<User> {
    let user = state
        .users
        .register(RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: TEST_PASSWORD.to_string(),
            confirm_password: TEST_PASSWORD.to_string(),
        })
        .await?;
    Ok(user)
}

pub fn bearer_for(user: &User) -> String {
    let token = AuthKeys::new(TEST_SECRET, 1)
        .issue(&user.email)
        .expect("token");
    format!("Bearer {token}")
}
