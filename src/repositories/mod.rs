pub mod favorites;
pub mod users;

use sea_orm::{DbErr, SqlErr};

/// Whether a store error is a unique-index violation (a duplicate key insert).
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
