//! Business logic services for the account system.

pub mod auth;

pub use auth::AuthUseCase;
