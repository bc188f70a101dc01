//! Tollgate Database Crate
//!
//! SQLite connection management, schema migrations, and the SQL-backed
//! implementation of the account storage contract.

use sqlx::SqlitePool;
use tollgate_config::DatabaseConfig;

pub mod connection;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;
pub use repos::SqliteUserStore;
pub use types::{map_sqlx_error, DatabaseError, DatabaseResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("test.db").display()),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let pool = initialize_database(&config).await.unwrap();
        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users.0, 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_a_connection_error() {
        let config = DatabaseConfig {
            url: "postgres://localhost/tollgate".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        };

        let err = initialize_database(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionError(_)));
    }
}
