//! Credential hashing and token encoding helpers.

pub mod jwt;
pub mod password;

pub use jwt::{AuthClaims, TokenCodec, TokenError};
pub use password::hash_password;
