//! Error types for the account system.

use thiserror::Error;

/// Failures reported by a [`UserStore`](crate::repositories::UserStore) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate value for unique field `{0}`")]
    DuplicateKey(String),

    #[error("expected {expected} affected row(s), got {actual}")]
    AffectedRows { expected: u64, actual: u64 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Authentication-related errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("required field missing")]
    DataIncomplete,

    #[error("username already taken")]
    UserDuplicate,

    #[error("email already registered")]
    EmailDuplicate,

    #[error("user not found")]
    UserNotFound,

    #[error("new password must differ from the old one")]
    PasswordSame,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid access token")]
    InvalidAccessToken,

    #[error("unknown error")]
    Unknown,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type AuthResult<T> = Result<T, AuthError>;
