use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthKeys,
    services::user_service::UserService,
};

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    keys: AuthKeys,
}

impl AuthService {
    pub fn new(users: UserService, keys: AuthKeys) -> Self {
        Self { users, keys }
    }

    pub async fn login(&self, payload: LoginRequest) -> AppResult<LoginResponse> {
        let LoginRequest { email, password } = payload;
        let email = email.trim();

        let Some((user, password_hash)) = self.users.credentials(email).await? else {
            return Err(AppError::BadRequest("Invalid email or password".into()));
        };

        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AppError::BadRequest("Invalid email or password".into()));
        }

        let token = self.keys.issue(&user.email)?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginResponse {
            token: format!("Bearer {token}"),
            username: user.username,
        })
    }
}
