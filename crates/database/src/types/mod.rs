//! Types shared across the database layer.

pub mod errors;

pub use errors::{map_sqlx_error, DatabaseError};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
