//! # Tollgate Users Crate
//!
//! Account lifecycle and token authentication for Tollgate. The crate owns
//! the user entity, the credential digest, the token codec, the storage
//! contract that persistence adapters implement, and the [`AuthUseCase`]
//! that composes them.
//!
//! ## Architecture
//!
//! - **Entities**: the `User` record and the request inputs
//! - **Repositories**: the `UserStore` contract plus an in-memory adapter
//! - **Services**: the authentication use case
//! - **Types**: error taxonomy
//! - **Utils**: credential hashing and token encoding
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tollgate_config::AuthConfig;
//! use tollgate_users::{AuthUseCase, InMemoryUserStore, RequestContext, SignInput, SignUpInput};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tollgate_users::AuthError> {
//! let auth = AuthUseCase::new(Arc::new(InMemoryUserStore::new()), &AuthConfig::default());
//! let ctx = RequestContext::background();
//!
//! auth.sign_up(&ctx, &SignUpInput::new("alice", "alice@example.com", "secret"))
//!     .await?;
//! let token = auth.sign_in(&ctx, &SignInput::new("alice", "secret")).await?;
//! let user = auth.parse_token(&ctx, &token)?;
//! assert_eq!(user.username, "alice");
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use context::RequestContext;
pub use entities::{ChangePasswordInput, DeleteInput, SignInput, SignUpInput, User};
pub use repositories::{InMemoryUserStore, UserStore};
pub use services::AuthUseCase;
pub use types::{AuthError, AuthResult, StoreError, StoreResult};
pub use utils::{hash_password, AuthClaims, TokenCodec, TokenError};
