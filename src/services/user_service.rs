use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use crate::{
    dto::auth::RegisterRequest,
    entity::users::ActiveModel as UserActive,
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::User,
    repositories::{self, users as store},
};

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Registration and identity lookup.
#[derive(Clone)]
pub struct UserService {
    orm: DatabaseConnection,
}

impl UserService {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }

    pub async fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        let RegisterRequest {
            username,
            email,
            password,
            confirm_password,
        } = payload;
        let username = username.trim().to_owned();
        let email = email.trim().to_owned();
        validate_registration(&username, &email, &password, &confirm_password)?;

        if store::exists_by_username(&self.orm, &username).await? {
            return Err(AppError::BadRequest("Username is already taken".into()));
        }
        if store::exists_by_email(&self.orm, &email).await? {
            return Err(AppError::BadRequest("Email is already registered".into()));
        }

        let password_hash = hash_password(&password)?;
        let user = UserActive {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().into()),
        };

        let user = match store::insert(&self.orm, user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration for the same name or email.
            Err(err) if repositories::is_unique_violation(&err) => {
                return Err(AppError::BadRequest(
                    "Username or email is already registered".into(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }

    pub async fn find_by_identity(&self, email: &str) -> AppResult<Option<User>> {
        Ok(store::find_by_email(&self.orm, email).await?.map(User::from))
    }

    /// Resolves an authenticated principal to its user row.
    pub async fn resolve(&self, principal: &Principal) -> AppResult<User> {
        self.find_by_identity(&principal.email)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub(crate) async fn credentials(&self, email: &str) -> AppResult<Option<(User, String)>> {
        let user = store::find_by_email(&self.orm, email).await?;
        Ok(user.map(|model| {
            let hash = model.password_hash.clone();
            (User::from(model), hash)
        }))
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// At least one uppercase letter and one special character.
pub fn is_password_strong(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase()) && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if username.chars().count() > 50 {
        return Err(AppError::BadRequest("Username must be at most 50 characters".into()));
    }
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Email is not valid".into()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }
    if password != confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }
    if !is_password_strong(password) {
        return Err(AppError::BadRequest(
            "Password must contain at least one uppercase letter and one special character".into(),
        ));
    }
    Ok(())
}
