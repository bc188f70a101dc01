//! Shared types for the account system.

pub mod errors;

pub use errors::{AuthError, AuthResult, StoreError, StoreResult};
