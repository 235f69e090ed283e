//! # Credential Service
//!
//! Implements `CredentialStoreApi` on top of any `CredentialRepository`.
//!
//! Verification is fail-closed: every path that is not a positive digest
//! match returns `false`, and every call logs its outcome without the PIN or
//! the digest.

use crate::domain::{hash_pin, Credential, CredentialError, HandleList, VerificationOutcome};
use crate::ports::inbound::CredentialStoreApi;
use crate::ports::outbound::CredentialRepository;
use async_trait::async_trait;
use shared_types::{Pin, RepositoryError, SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The Credential Store service.
pub struct CredentialService<R: CredentialRepository> {
    repository: Arc<R>,
    time_source: Arc<dyn TimeSource>,
}

impl<R: CredentialRepository> CredentialService<R> {
    /// Create a service stamping times from the system clock.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_time_source(repository, Arc::new(SystemTimeSource))
    }

    /// Create a service with an explicit clock.
    pub fn with_time_source(repository: Arc<R>, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            repository,
            time_source,
        }
    }

    /// Underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

#[async_trait]
impl<R: CredentialRepository> CredentialStoreApi for CredentialService<R> {
    async fn verify_detailed(&self, handle: &str, pin: &Pin) -> VerificationOutcome {
        let outcome = if pin.is_empty() {
            VerificationOutcome::EmptyPin
        } else {
            match self.repository.find_credential(handle).await {
                Ok(Some(credential)) if credential.pin_hash.matches(&hash_pin(pin)) => {
                    VerificationOutcome::Verified
                }
                Ok(Some(_)) => VerificationOutcome::Mismatch,
                Ok(None) => VerificationOutcome::UnknownHandle,
                Err(e) => {
                    error!(handle, error = %e, "[sr-01] Credential lookup failed");
                    VerificationOutcome::LookupError
                }
            }
        };

        match outcome {
            VerificationOutcome::Verified => {
                info!(handle, outcome = outcome.as_str(), "[sr-01] PIN verified")
            }
            _ => warn!(
                handle,
                outcome = outcome.as_str(),
                "[sr-01] PIN verification failed"
            ),
        }
        outcome
    }

    async fn rotate(&self, handle: &str, new_pin: &Pin) -> Result<(), CredentialError> {
        if new_pin.is_empty() {
            return Err(CredentialError::Validation("new PIN is empty".into()));
        }

        match self.repository.update_pin_hash(handle, hash_pin(new_pin)).await {
            Ok(true) => {
                info!(handle, "[sr-01] PIN rotated");
                Ok(())
            }
            Ok(false) => {
                warn!(handle, "[sr-01] Rotation addressed unknown handle");
                Err(RepositoryError::NotFound(format!("handle {handle}")).into())
            }
            Err(e) => {
                error!(handle, error = %e, "[sr-01] PIN rotation failed");
                Err(e.into())
            }
        }
    }

    async fn touch_last_used(&self, handle: &str) -> bool {
        let now = self.time_source.now();
        match self.repository.update_last_used(handle, now).await {
            Ok(true) => {
                debug!(handle, "[sr-01] last_used updated");
                true
            }
            Ok(false) => {
                warn!(handle, "[sr-01] last_used not updated: unknown handle");
                false
            }
            Err(e) => {
                warn!(handle, error = %e, "[sr-01] last_used update failed");
                false
            }
        }
    }

    async fn list_handles(&self) -> HandleList {
        match self.repository.list_handles().await {
            Ok(handles) => {
                debug!(count = handles.len(), "[sr-01] Listed handles");
                HandleList::ok(handles)
            }
            Err(e) => {
                warn!(error = %e, "[sr-01] Handle listing failed");
                HandleList::failed(e.into())
            }
        }
    }

    async fn enroll(&self, handle: &str, pin: &Pin) -> Result<(), CredentialError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(CredentialError::Validation("handle is empty".into()));
        }
        if pin.is_empty() {
            return Err(CredentialError::Validation("PIN is empty".into()));
        }

        let credential = Credential::new(handle, hash_pin(pin));
        match self.repository.insert_credential(credential).await {
            Ok(()) => {
                info!(handle, "[sr-01] Handle enrolled");
                Ok(())
            }
            Err(RepositoryError::Conflict(_)) => {
                Err(CredentialError::DuplicateHandle(handle.to_string()))
            }
            Err(e) => {
                error!(handle, error = %e, "[sr-01] Enrolment failed");
                Err(e.into())
            }
        }
    }
}
