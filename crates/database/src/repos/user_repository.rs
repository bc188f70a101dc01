//! User repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tollgate_users::{RequestContext, StoreError, StoreResult, User, UserStore};
use tracing::{debug, warn};

use crate::types::map_sqlx_error;

/// [`UserStore`] backed by the `users` table
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_user(row: &SqliteRow) -> User {
        User {
            id: row.get("public_id"),
            username: row.get("username"),
            email: row.get("email"),
            password: row.get("password"),
        }
    }

    async fn exists_where(&self, column: &'static str, value: &str) -> StoreResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {column} = ?) AS found");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.get::<bool, _>("found"))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create_user(&self, ctx: &RequestContext, user: &User) -> StoreResult<User> {
        ctx.run(async {
            let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

            let public_id = cuid2::create_id();
            let now = Utc::now().to_rfc3339();

            sqlx::query(
                "INSERT INTO users (public_id, username, email, password, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&public_id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            tx.commit().await.map_err(map_sqlx_error)?;

            debug!(user_id = %public_id, "inserted user row");
            Ok(user.clone().with_id(public_id))
        })
        .await
    }

    async fn get_user_by_credentials(
        &self,
        ctx: &RequestContext,
        username: &str,
        password_digest: &str,
    ) -> StoreResult<User> {
        ctx.run(async {
            let row = sqlx::query(
                "SELECT public_id, username, email, password FROM users WHERE username = ? AND password = ?",
            )
            .bind(username)
            .bind(password_digest)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            row.as_ref()
                .map(Self::row_to_user)
                .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn exists_by_username(&self, ctx: &RequestContext, username: &str) -> StoreResult<bool> {
        ctx.run(self.exists_where("username", username)).await
    }

    async fn exists_by_email(&self, ctx: &RequestContext, email: &str) -> StoreResult<bool> {
        ctx.run(self.exists_where("email", email)).await
    }

    async fn update_password(
        &self,
        ctx: &RequestContext,
        username: &str,
        old_digest: &str,
        new_digest: &str,
    ) -> StoreResult<()> {
        ctx.run(async {
            let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

            let result = sqlx::query(
                "UPDATE users SET password = ?, updated_at = ? WHERE username = ? AND password = ?",
            )
            .bind(new_digest)
            .bind(Utc::now().to_rfc3339())
            .bind(username)
            .bind(old_digest)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            // Dropping the transaction without commit rolls it back.
            let affected = result.rows_affected();
            if affected != 1 {
                warn!(affected, "password update rolled back");
                return Err(StoreError::AffectedRows {
                    expected: 1,
                    actual: affected,
                });
            }

            tx.commit().await.map_err(map_sqlx_error)?;
            Ok(())
        })
        .await
    }

    async fn delete_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        password_digest: &str,
    ) -> StoreResult<()> {
        ctx.run(async {
            let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

            let result = sqlx::query("DELETE FROM users WHERE username = ? AND password = ?")
                .bind(username)
                .bind(password_digest)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

            match result.rows_affected() {
                0 => Err(StoreError::NotFound),
                1 => {
                    tx.commit().await.map_err(map_sqlx_error)?;
                    Ok(())
                }
                affected => {
                    warn!(affected, "account deletion rolled back");
                    Err(StoreError::AffectedRows {
                        expected: 1,
                        actual: affected,
                    })
                }
            }
        })
        .await
    }
}
