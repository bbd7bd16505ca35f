//! # ladsim-adapter-storage-sqlite-sqlx
//!
//! `SQLite` historian using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `HistoryRepository` port defined in `ladsim-app::ports::history`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between history records and database rows
//!
//! ## Dependency rule
//! Depends on `ladsim-app` (for port traits) and `ladsim-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod history_repo;
pub mod pool;

pub use error::StorageError;
pub use history_repo::SqliteHistoryRepository;
pub use pool::{Config, Database};
