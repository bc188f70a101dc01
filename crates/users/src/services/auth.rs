//! Account lifecycle: sign-up, sign-in, password rotation, deletion and
//! token parsing.

use std::sync::Arc;
use std::time::Duration;

use tollgate_config::AuthConfig;
use tracing::{debug, info, warn};

use crate::context::RequestContext;
use crate::entities::{ChangePasswordInput, DeleteInput, SignInput, SignUpInput, User};
use crate::repositories::UserStore;
use crate::types::{AuthError, AuthResult, StoreError};
use crate::utils::{hash_password, TokenCodec};

/// Orchestrates the account operations over an abstract [`UserStore`].
///
/// Configuration is captured once at construction and never mutated, so a
/// single instance can be shared across any number of concurrent requests.
#[derive(Clone)]
pub struct AuthUseCase {
    store: Arc<dyn UserStore>,
    hash_salt: String,
    codec: TokenCodec,
}

impl AuthUseCase {
    pub fn new(store: Arc<dyn UserStore>, config: &AuthConfig) -> Self {
        Self {
            store,
            hash_salt: config.hash_salt.clone(),
            codec: TokenCodec::new(
                config.signing_key.as_bytes(),
                Duration::from_secs(config.token_ttl_seconds),
            ),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn digest(&self, password: &str) -> String {
        hash_password(password, &self.hash_salt)
    }

    /// Register a new account.
    pub async fn sign_up(&self, ctx: &RequestContext, input: &SignUpInput) -> AuthResult<()> {
        if !input.is_complete() {
            debug!("sign-up rejected: incomplete data");
            return Err(AuthError::DataIncomplete);
        }

        if self.store.exists_by_username(ctx, &input.username).await? {
            debug!(username = %input.username, "sign-up rejected: username taken");
            return Err(AuthError::UserDuplicate);
        }

        if self.store.exists_by_email(ctx, &input.email).await? {
            debug!(username = %input.username, "sign-up rejected: email taken");
            return Err(AuthError::EmailDuplicate);
        }

        let user = User::new(
            input.username.as_str(),
            input.email.as_str(),
            self.digest(&input.password),
        );
        let stored = self.store.create_user(ctx, &user).await?;

        info!(username = %stored.username, user_id = %stored.id, "user signed up");
        Ok(())
    }

    /// Authenticate and mint an access token.
    ///
    /// A wrong username and a wrong password fail identically.
    pub async fn sign_in(&self, ctx: &RequestContext, input: &SignInput) -> AuthResult<String> {
        let digest = self.digest(&input.password);

        let user = match self
            .store
            .get_user_by_credentials(ctx, &input.username, &digest)
            .await
        {
            Ok(user) => user,
            Err(err) => {
                debug!(username = %input.username, error = %err, "sign-in rejected");
                return Err(AuthError::UserNotFound);
            }
        };

        let token = self.codec.issue(&user).map_err(|err| {
            warn!(error = %err, "failed to issue access token");
            AuthError::Unknown
        })?;

        info!(username = %user.username, "user signed in");
        Ok(token)
    }

    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        input: &ChangePasswordInput,
    ) -> AuthResult<()> {
        if !input.is_complete() {
            debug!("password change rejected: incomplete data");
            return Err(AuthError::DataIncomplete);
        }

        if input.old_password == input.new_password {
            debug!(username = %input.username, "password change rejected: unchanged password");
            return Err(AuthError::PasswordSame);
        }

        let old_digest = self.digest(&input.old_password);
        let new_digest = self.digest(&input.new_password);

        self.store
            .get_user_by_credentials(ctx, &input.username, &old_digest)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => {
                    debug!(username = %input.username, "password change rejected: bad credentials");
                    AuthError::UserNotFound
                }
                other => AuthError::Store(other),
            })?;

        self.store
            .update_password(ctx, &input.username, &old_digest, &new_digest)
            .await
            .map_err(|err| match err {
                StoreError::AffectedRows { expected, actual } => {
                    warn!(
                        username = %input.username,
                        expected,
                        actual,
                        "password update affected an unexpected number of rows"
                    );
                    AuthError::InvalidCredentials
                }
                StoreError::NotFound => AuthError::UserNotFound,
                other => AuthError::Store(other),
            })?;

        info!(username = %input.username, "password changed");
        Ok(())
    }

    pub async fn delete_account(&self, ctx: &RequestContext, input: &DeleteInput) -> AuthResult<()> {
        let digest = self.digest(&input.password);

        self.store
            .delete_user(ctx, &input.username, &digest)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => {
                    debug!(username = %input.username, "account deletion rejected: no match");
                    AuthError::UserNotFound
                }
                StoreError::AffectedRows { expected, actual } => {
                    warn!(
                        username = %input.username,
                        expected,
                        actual,
                        "account deletion affected an unexpected number of rows"
                    );
                    AuthError::InvalidCredentials
                }
                other => AuthError::Store(other),
            })?;

        info!(username = %input.username, "account deleted");
        Ok(())
    }

    /// Round-trip a cheap read against the store.
    pub async fn check_store(&self, ctx: &RequestContext) -> AuthResult<()> {
        self.store.exists_by_username(ctx, "").await.map_err(|err| {
            warn!(error = %err, "store health check failed");
            AuthError::Store(err)
        })?;
        Ok(())
    }

    /// Verify `token` and return the user embedded at issuance.
    ///
    /// Storage is not consulted, so changes made after the token was issued
    /// are not reflected.
    pub fn parse_token(&self, _ctx: &RequestContext, token: &str) -> AuthResult<User> {
        self.codec.verify(token).map_err(|err| {
            debug!(error = %err, "access token rejected");
            AuthError::InvalidAccessToken
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserStore;
    use chrono::{Duration as ChronoDuration, Utc};

    const SALT: &str = "salt";

    fn config() -> AuthConfig {
        AuthConfig {
            hash_salt: SALT.to_string(),
            signing_key: "signing_key".to_string(),
            token_ttl_seconds: 3_600,
        }
    }

    fn use_case(store: MockUserStore) -> AuthUseCase {
        AuthUseCase::new(Arc::new(store), &config())
    }

    fn stored_user(password: &str) -> User {
        User::new("alice", "alice@example.com", hash_password(password, SALT)).with_id("user-1")
    }

    #[tokio::test]
    async fn test_sign_up_hashes_password_before_storing() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .withf(|_, username| username == "alice")
            .times(1)
            .returning(|_, _| Ok(false));
        store
            .expect_exists_by_email()
            .withf(|_, email| email == "alice@example.com")
            .times(1)
            .returning(|_, _| Ok(false));
        store
            .expect_create_user()
            .withf(|_, user| {
                user.username == "alice"
                    && user.email == "alice@example.com"
                    && user.password == "38a8fde622c0cf723934ba7138a72beaccfc69d4"
            })
            .times(1)
            .returning(|_, user| Ok(user.clone().with_id("user-1")));

        let auth = use_case(store);
        let ctx = RequestContext::background();
        let input = SignUpInput::new("alice", "alice@example.com", "Password");

        assert_eq!(auth.sign_up(&ctx, &input).await, Ok(()));
    }

    #[tokio::test]
    async fn test_check_store_surfaces_backend_failure() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_, _| Err(StoreError::Backend("database is locked".to_string())));

        let auth = use_case(store);
        let ctx = RequestContext::background();

        assert_eq!(
            auth.check_store(&ctx).await,
            Err(AuthError::Store(StoreError::Backend(
                "database is locked".to_string()
            )))
        );
    }

    #[tokio::test]
    async fn test_check_store_passes_when_store_answers() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_, _| Ok(false));

        let auth = use_case(store);
        assert_eq!(auth.check_store(&RequestContext::background()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_sign_up_with_missing_field_never_touches_store() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().never();
        store.expect_exists_by_email().never();
        store.expect_create_user().never();

        let auth = use_case(store);
        let ctx = RequestContext::background();

        for input in [
            SignUpInput::new("", "alice@example.com", "pass"),
            SignUpInput::new("alice", "", "pass"),
            SignUpInput::new("alice", "alice@example.com", ""),
        ] {
            assert_eq!(auth.sign_up(&ctx, &input).await, Err(AuthError::DataIncomplete));
        }
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_username_skips_email_probe() {
        let mut store = MockUserStore::new();
        store
            .expect_exists_by_username()
            .times(1)
            .returning(|_, _| Ok(true));
        store.expect_exists_by_email().never();
        store.expect_create_user().never();

        let auth = use_case(store);
        let result = auth
            .sign_up(
                &RequestContext::background(),
                &SignUpInput::new("alice", "alice@example.com", "pass"),
            )
            .await;

        assert_eq!(result, Err(AuthError::UserDuplicate));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().returning(|_, _| Ok(false));
        store.expect_exists_by_email().returning(|_, _| Ok(true));
        store.expect_create_user().never();

        let auth = use_case(store);
        let result = auth
            .sign_up(
                &RequestContext::background(),
                &SignUpInput::new("alice", "alice@example.com", "pass"),
            )
            .await;

        assert_eq!(result, Err(AuthError::EmailDuplicate));
    }

    #[tokio::test]
    async fn test_sign_up_propagates_store_conflict() {
        let mut store = MockUserStore::new();
        store.expect_exists_by_username().returning(|_, _| Ok(false));
        store.expect_exists_by_email().returning(|_, _| Ok(false));
        store
            .expect_create_user()
            .returning(|_, _| Err(StoreError::DuplicateKey("username".to_string())));

        let auth = use_case(store);
        let result = auth
            .sign_up(
                &RequestContext::background(),
                &SignUpInput::new("alice", "alice@example.com", "pass"),
            )
            .await;

        assert_eq!(
            result,
            Err(AuthError::Store(StoreError::DuplicateKey("username".to_string())))
        );
    }

    #[tokio::test]
    async fn test_sign_in_returns_token_with_fetched_user() {
        let mut store = MockUserStore::new();
        store
            .expect_get_user_by_credentials()
            .withf(|_, username, digest| {
                username == "alice" && digest == "11f5639f22525155cb0b43573ee4212838c78d87"
            })
            .times(1)
            .returning(|_, _, _| Ok(stored_user("pass")));

        let auth = use_case(store);
        let ctx = RequestContext::background();
        let token = auth.sign_in(&ctx, &SignInput::new("alice", "pass")).await.unwrap();

        assert!(!token.is_empty());
        assert_eq!(auth.parse_token(&ctx, &token).unwrap(), stored_user("pass"));
    }

    #[tokio::test]
    async fn test_sign_in_hides_store_error_detail() {
        for failure in [
            StoreError::NotFound,
            StoreError::Backend("connection reset".to_string()),
        ] {
            let mut store = MockUserStore::new();
            store
                .expect_get_user_by_credentials()
                .returning(move |_, _, _| Err(failure.clone()));

            let auth = use_case(store);
            let result = auth
                .sign_in(&RequestContext::background(), &SignInput::new("alice", "nope"))
                .await;

            assert_eq!(result, Err(AuthError::UserNotFound));
        }
    }

    #[tokio::test]
    async fn test_change_password_same_password_rejected_first() {
        let mut store = MockUserStore::new();
        store.expect_get_user_by_credentials().never();
        store.expect_update_password().never();

        let auth = use_case(store);
        let result = auth
            .change_password(
                &RequestContext::background(),
                &ChangePasswordInput::new("alice", "same", "same"),
            )
            .await;

        assert_eq!(result, Err(AuthError::PasswordSame));
    }

    #[tokio::test]
    async fn test_change_password_requires_every_field() {
        let mut store = MockUserStore::new();
        store.expect_get_user_by_credentials().never();
        store.expect_update_password().never();

        let auth = use_case(store);
        let result = auth
            .change_password(
                &RequestContext::background(),
                &ChangePasswordInput::new("alice", "", ""),
            )
            .await;

        assert_eq!(result, Err(AuthError::DataIncomplete));
    }

    #[tokio::test]
    async fn test_change_password_unknown_credentials() {
        let mut store = MockUserStore::new();
        store
            .expect_get_user_by_credentials()
            .returning(|_, _, _| Err(StoreError::NotFound));
        store.expect_update_password().never();

        let auth = use_case(store);
        let result = auth
            .change_password(
                &RequestContext::background(),
                &ChangePasswordInput::new("alice", "wrong", "next"),
            )
            .await;

        assert_eq!(result, Err(AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_change_password_updates_with_both_digests() {
        let old_digest = hash_password("old", SALT);
        let new_digest = hash_password("new", SALT);

        let mut store = MockUserStore::new();
        store
            .expect_get_user_by_credentials()
            .returning(|_, _, _| Ok(stored_user("old")));
        store
            .expect_update_password()
            .withf(move |_, username, old, new| {
                username == "alice" && old == old_digest && new == new_digest
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let auth = use_case(store);
        let result = auth
            .change_password(
                &RequestContext::background(),
                &ChangePasswordInput::new("alice", "old", "new"),
            )
            .await;

        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_change_password_ambiguous_update_is_rejected() {
        for actual in [0_u64, 2] {
            let mut store = MockUserStore::new();
            store
                .expect_get_user_by_credentials()
                .returning(|_, _, _| Ok(stored_user("old")));
            store
                .expect_update_password()
                .times(1)
                .returning(move |_, _, _, _| Err(StoreError::AffectedRows { expected: 1, actual }));

            let auth = use_case(store);
            let result = auth
                .change_password(
                    &RequestContext::background(),
                    &ChangePasswordInput::new("alice", "old", "new"),
                )
                .await;

            assert_eq!(result, Err(AuthError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_change_password_passes_through_other_store_errors() {
        let mut store = MockUserStore::new();
        store
            .expect_get_user_by_credentials()
            .returning(|_, _, _| Err(StoreError::DeadlineExceeded));

        let auth = use_case(store);
        let result = auth
            .change_password(
                &RequestContext::background(),
                &ChangePasswordInput::new("alice", "old", "new"),
            )
            .await;

        assert_eq!(result, Err(AuthError::Store(StoreError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_delete_account_maps_store_outcomes() {
        let cases = [
            (Ok(()), Ok(())),
            (Err(StoreError::NotFound), Err(AuthError::UserNotFound)),
            (
                Err(StoreError::AffectedRows {
                    expected: 1,
                    actual: 2,
                }),
                Err(AuthError::InvalidCredentials),
            ),
            (
                Err(StoreError::Backend("disk full".to_string())),
                Err(AuthError::Store(StoreError::Backend("disk full".to_string()))),
            ),
        ];

        for (outcome, expected) in cases {
            let mut store = MockUserStore::new();
            store
                .expect_delete_user()
                .withf(|_, username, digest| {
                    username == "alice" && digest == "11f5639f22525155cb0b43573ee4212838c78d87"
                })
                .times(1)
                .returning(move |_, _, _| outcome.clone());

            let auth = use_case(store);
            let result = auth
                .delete_account(&RequestContext::background(), &DeleteInput::new("alice", "pass"))
                .await;

            assert_eq!(result, expected);
        }
    }

    #[test]
    fn test_parse_token_rejects_expired_token() {
        let auth = use_case(MockUserStore::new());
        let token = auth
            .codec()
            .issue_at(&stored_user("pass"), Utc::now() - ChronoDuration::hours(2))
            .unwrap();

        assert_eq!(
            auth.parse_token(&RequestContext::background(), &token),
            Err(AuthError::InvalidAccessToken)
        );
    }

    #[test]
    fn test_parse_token_rejects_foreign_signature() {
        let auth = use_case(MockUserStore::new());
        let foreign = TokenCodec::new(b"someone_else", Duration::from_secs(60))
            .issue(&stored_user("pass"))
            .unwrap();

        assert_eq!(
            auth.parse_token(&RequestContext::background(), &foreign),
            Err(AuthError::InvalidAccessToken)
        );
    }
}
