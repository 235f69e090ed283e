//! # Domain Errors

use shared_types::RepositoryError;
use thiserror::Error;

/// Directory error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Entry rejected before reaching storage.
    #[error("Invalid directory entry: {0}")]
    Validation(String),

    /// Persistence failure.
    #[error("{0}")]
    Storage(#[from] RepositoryError),
}
