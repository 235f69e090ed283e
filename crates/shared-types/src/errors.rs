//! # Error Types
//!
//! Defines the error every repository port returns.

use thiserror::Error;

/// Failure reported by a repository adapter (relational store, in-memory
/// fake, ...). Subsystem errors wrap it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The addressed row does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The statement failed inside the store. The transaction was rolled back.
    #[error("Database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// True for failures where retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, RepositoryError::Unavailable(_))
    }
}
