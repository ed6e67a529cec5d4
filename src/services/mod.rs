pub mod auth_service;
pub mod favorite_service;
pub mod user_service;
