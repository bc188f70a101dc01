//! Domain entities for account management.
//!
//! The `User` record is owned by whichever store backs the service; the
//! input types are transient values that live for a single request.

pub mod inputs;
pub mod user;

pub use inputs::{ChangePasswordInput, DeleteInput, SignInput, SignUpInput};
pub use user::User;
