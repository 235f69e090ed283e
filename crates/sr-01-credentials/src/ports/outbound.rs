//! # Outbound Ports
//!
//! Persistence required by the Credential Store.

use crate::domain::{Credential, PinHash};
use async_trait::async_trait;
use shared_types::{Handle, RepositoryError, Timestamp};

/// Credential persistence - outbound port.
///
/// Every write is atomic: on `Err` the stored row is unchanged.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Load the credential for a handle.
    async fn find_credential(&self, handle: &str) -> Result<Option<Credential>, RepositoryError>;

    /// Insert a new credential. `Conflict` if the handle exists.
    async fn insert_credential(&self, credential: Credential) -> Result<(), RepositoryError>;

    /// Overwrite the PIN hash. `Ok(false)` when no row matched.
    async fn update_pin_hash(&self, handle: &str, pin_hash: PinHash)
        -> Result<bool, RepositoryError>;

    /// Set `last_used`. `Ok(false)` when no row matched.
    async fn update_last_used(&self, handle: &str, at: Timestamp)
        -> Result<bool, RepositoryError>;

    /// Handles in ascending lexical order.
    async fn list_handles(&self) -> Result<Vec<Handle>, RepositoryError>;
}
