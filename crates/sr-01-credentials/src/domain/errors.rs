//! # Domain Errors
//!
//! Error types for the Credential Store.

use shared_types::{Handle, RepositoryError};
use thiserror::Error;

/// Credential store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Enrolment input rejected before reaching storage.
    #[error("Invalid credential input: {0}")]
    Validation(String),

    /// Enrolment of a handle that already exists.
    #[error("Handle already enrolled: {0}")]
    DuplicateHandle(Handle),

    /// Persistence failure. Prior state is unchanged.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_handle_error() {
        let err = CredentialError::DuplicateHandle("ALPHA1".to_string());
        assert!(err.to_string().contains("ALPHA1"));
    }

    #[test]
    fn test_storage_error_wraps_repository_message() {
        let err: CredentialError = RepositoryError::Database("locked".into()).into();
        assert_eq!(err.to_string(), "Storage error: Database error: locked");
    }
}
