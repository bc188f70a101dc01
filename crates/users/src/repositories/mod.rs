//! Storage contract consumed by the authentication use case.
//!
//! Adapters implement [`UserStore`]; the use case holds it as a trait
//! object and never names a concrete backend.

pub mod memory;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::entities::User;
use crate::types::StoreResult;

pub use memory::InMemoryUserStore;

/// Persistence operations over user records.
///
/// Every mutating call must be atomic: an existence check and the write it
/// guards are observed together or not at all. Uniqueness of username and
/// email is enforced here as well, even when the caller already probed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist `user`, returning the stored record with its assigned id.
    async fn create_user(&self, ctx: &RequestContext, user: &User) -> StoreResult<User>;

    /// Fetch the record matching both `username` and `password_digest`.
    async fn get_user_by_credentials(
        &self,
        ctx: &RequestContext,
        username: &str,
        password_digest: &str,
    ) -> StoreResult<User>;

    async fn exists_by_username(&self, ctx: &RequestContext, username: &str) -> StoreResult<bool>;

    async fn exists_by_email(&self, ctx: &RequestContext, email: &str) -> StoreResult<bool>;

    /// Replace the digest of the record matching `username` and `old_digest`.
    ///
    /// Exactly one record must change; any other count is reported as
    /// [`StoreError::AffectedRows`](crate::types::StoreError::AffectedRows)
    /// and leaves storage untouched.
    async fn update_password(
        &self,
        ctx: &RequestContext,
        username: &str,
        old_digest: &str,
        new_digest: &str,
    ) -> StoreResult<()>;

    /// Remove the record matching `username` and `password_digest`.
    async fn delete_user(
        &self,
        ctx: &RequestContext,
        username: &str,
        password_digest: &str,
    ) -> StoreResult<()>;
}
