//! Storage adapters backed by SQLite.

pub mod user_repository;

pub use user_repository::SqliteUserStore;
