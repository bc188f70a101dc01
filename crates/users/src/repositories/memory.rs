//! Process-local user store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::UserStore;
use crate::context::RequestContext;
use crate::entities::User;
use crate::types::{StoreError, StoreResult};

/// [`UserStore`] backed by a map guarded by a single lock.
///
/// Each operation runs its checks and its write under one write guard, so
/// concurrent callers cannot interleave between them.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn matching<'a>(
        users: &'a HashMap<String, User>,
        username: &'a str,
        digest: &'a str,
    ) -> impl Iterator<Item = &'a User> + 'a {
        users
            .values()
            .filter(move |user| user.username == username && user.password == digest)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, ctx: &RequestContext, user: &User) -> StoreResult<User> {
        ctx.run(async {
            let mut users = self.users.write().await;

            if users.values().any(|existing| existing.username == user.username) {
                return Err(StoreError::DuplicateKey("username".to_string()));
            }
            if users.values().any(|existing| existing.email == user.email) {
                return Err(StoreError::DuplicateKey("email".to_string()));
            }

            let stored = user.clone().with_id(cuid2::create_id());
            users.insert(stored.id.clone(), stored.clone());
            debug!(user_id = %stored.id, "stored user in memory");
            Ok(stored)
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
            let users = self.users.read().await;
            let found = Self::matching(&users, username, password_digest)
                .next()
                .cloned()
                .ok_or(StoreError::NotFound);
            found
        })
        .await
    }

    async fn exists_by_username(&self, ctx: &RequestContext, username: &str) -> StoreResult<bool> {
        ctx.run(async {
            let users = self.users.read().await;
            Ok(users.values().any(|user| user.username == username))
        })
        .await
    }

    async fn exists_by_email(&self, ctx: &RequestContext, email: &str) -> StoreResult<bool> {
        ctx.run(async {
            let users = self.users.read().await;
            Ok(users.values().any(|user| user.email == email))
        })
        .await
    }

    async fn update_password(
        &self,
        ctx: &RequestContext,
        username: &str,
        old_digest: &str,
        new_digest: &str,
    ) -> StoreResult<()> {
        ctx.run(async {
            let mut users = self.users.write().await;
            let ids: Vec<String> = Self::matching(&users, username, old_digest)
                .map(|user| user.id.clone())
                .collect();

            if ids.len() != 1 {
                return Err(StoreError::AffectedRows {
                    expected: 1,
                    actual: ids.len() as u64,
                });
            }

            if let Some(user) = users.get_mut(&ids[0]) {
                user.password = new_digest.to_string();
            }
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
            let mut users = self.users.write().await;
            let ids: Vec<String> = Self::matching(&users, username, password_digest)
                .map(|user| user.id.clone())
                .collect();

            match ids.as_slice() {
                [] => Err(StoreError::NotFound),
                [id] => {
                    users.remove(id);
                    Ok(())
                }
                _ => Err(StoreError::AffectedRows {
                    expected: 1,
                    actual: ids.len() as u64,
                }),
            }
        })
        .await
    }
}
