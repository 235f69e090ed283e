//! # Domain Errors

use shared_types::RepositoryError;
use thiserror::Error;

/// Report store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Report rejected before reaching storage.
    #[error("Invalid report: {0}")]
    Validation(String),

    /// Persistence failure. Nothing was written.
    #[error("{0}")]
    Storage(#[from] RepositoryError),
}
