//! # Storage Adapters
//!
//! SQLite is the production backend for every subsystem repository. The
//! in-memory adapters in each subsystem crate remain available for tests.

pub mod sqlite;

pub use sqlite::{SqliteStore, StorageError, StoredTotals, CURRENT_SCHEMA_VERSION};
