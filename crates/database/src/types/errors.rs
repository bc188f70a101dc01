//! Error types for the database layer

use thiserror::Error;
use tollgate_users::StoreError;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Translate a driver error into the storage contract's error.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            // SQLite reports "UNIQUE constraint failed: users.<column>"
            let message = db.message();
            let field = if message.contains("users.email") {
                "email"
            } else if message.contains("users.username") {
                "username"
            } else {
                "public_id"
            };
            StoreError::DuplicateKey(field.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}
