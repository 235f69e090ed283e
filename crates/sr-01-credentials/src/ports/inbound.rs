//! # Inbound Ports
//!
//! API trait defining what the Credential Store can do.

use crate::domain::{CredentialError, HandleList, PinHash, VerificationOutcome};
use async_trait::async_trait;
use shared_types::Pin;

/// Credential store API - inbound port.
#[async_trait]
pub trait CredentialStoreApi: Send + Sync {
    /// SHA-256 hex digest of a PIN.
    fn hash_pin(&self, pin: &Pin) -> PinHash {
        crate::domain::hash_pin(pin)
    }

    /// Verify a PIN and report why it failed.
    ///
    /// Never errors: repository failures become
    /// [`VerificationOutcome::LookupError`].
    async fn verify_detailed(&self, handle: &str, pin: &Pin) -> VerificationOutcome;

    /// Fail-closed verification.
    async fn verify(&self, handle: &str, pin: &Pin) -> bool {
        self.verify_detailed(handle, pin).await.is_verified()
    }

    /// Whether the PIN is an administrator-issued temporary PIN.
    fn is_temporary(&self, pin: &Pin) -> bool {
        crate::domain::is_temporary(pin)
    }

    /// Replace the stored PIN hash. No old-PIN check.
    async fn rotate(&self, handle: &str, new_pin: &Pin) -> Result<(), CredentialError>;

    /// Stamp `last_used` with the current time. Best-effort.
    async fn touch_last_used(&self, handle: &str) -> bool;

    /// All handles, ascending.
    async fn list_handles(&self) -> HandleList;

    /// Administrative enrolment of a new handle.
    async fn enroll(&self, handle: &str, pin: &Pin) -> Result<(), CredentialError>;
}
