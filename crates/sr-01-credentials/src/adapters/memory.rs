//! In-Memory Credential Repository
//!
//! Implements `CredentialRepository` over a `BTreeMap`, with failure
//! injection for tests.

use crate::domain::{Credential, PinHash};
use crate::ports::outbound::CredentialRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Handle, RepositoryError, Timestamp};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory credential table keyed by handle.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    credentials: RwLock<BTreeMap<Handle, Credential>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryCredentialRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed credentials directly, bypassing enrolment.
    pub fn with_credentials(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let repo = Self::new();
        {
            let mut table = repo.credentials.write();
            for credential in credentials {
                table.insert(credential.handle.clone(), credential);
            }
        }
        repo
    }

    /// Make every read fail with `Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with `Database`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of port calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of one stored credential.
    pub fn get(&self, handle: &str) -> Option<Credential> {
        self.credentials.read().get(handle).cloned()
    }

    fn check_read(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("credential store offline".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("credential write rejected".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_credential(&self, handle: &str) -> Result<Option<Credential>, RepositoryError> {
        self.check_read()?;
        Ok(self.credentials.read().get(handle).cloned())
    }

    async fn insert_credential(&self, credential: Credential) -> Result<(), RepositoryError> {
        self.check_write()?;
        let mut table = self.credentials.write();
        if table.contains_key(&credential.handle) {
            return Err(RepositoryError::Conflict(credential.handle));
        }
        table.insert(credential.handle.clone(), credential);
        Ok(())
    }

    async fn update_pin_hash(
        &self,
        handle: &str,
        pin_hash: PinHash,
    ) -> Result<bool, RepositoryError> {
        self.check_write()?;
        match self.credentials.write().get_mut(handle) {
            Some(credential) => {
                credential.pin_hash = pin_hash;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_last_used(&self, handle: &str, at: Timestamp) -> Result<bool, RepositoryError> {
        self.check_write()?;
        match self.credentials.write().get_mut(handle) {
            Some(credential) => {
                credential.last_used = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_handles(&self) -> Result<Vec<Handle>, RepositoryError> {
        self.check_read()?;
        Ok(self.credentials.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hash_pin;
    use shared_types::Pin;

    fn credential(handle: &str, pin: &str) -> Credential {
        Credential::new(handle, hash_pin(&Pin::from(pin)))
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = InMemoryCredentialRepository::new();
        repo.insert_credential(credential("ALPHA1", "z9931"))
            .await
            .unwrap();
        let found = repo.find_credential("ALPHA1").await.unwrap().unwrap();
        assert_eq!(found.pin_hash, hash_pin(&Pin::from("z9931")));
        assert!(found.last_used.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = InMemoryCredentialRepository::with_credentials([credential("ALPHA1", "1111")]);
        let result = repo.insert_credential(credential("ALPHA1", "2222")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(
            repo.get("ALPHA1").unwrap().pin_hash,
            hash_pin(&Pin::from("1111"))
        );
    }

    #[tokio::test]
    async fn test_update_unknown_handle_reports_no_row() {
        let repo = InMemoryCredentialRepository::new();
        let updated = repo
            .update_pin_hash("GHOST", hash_pin(&Pin::from("1234")))
            .await
            .unwrap();
        assert!(!updated);
        assert!(repo.get("GHOST").is_none());
    }

    #[tokio::test]
    async fn test_list_handles_sorted() {
        let repo = InMemoryCredentialRepository::with_credentials([
            credential("CHARLIE3", "1"),
            credential("ALPHA1", "1"),
            credential("BRAVO2", "1"),
        ]);
        let handles = repo.list_handles().await.unwrap();
        assert_eq!(handles, vec!["ALPHA1", "BRAVO2", "CHARLIE3"]);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let repo = InMemoryCredentialRepository::with_credentials([credential("ALPHA1", "1")]);
        repo.set_fail_reads(true);
        tokio_test::assert_err!(repo.find_credential("ALPHA1").await);
        repo.set_fail_reads(false);
        repo.set_fail_writes(true);
        let result = repo
            .update_pin_hash("ALPHA1", hash_pin(&Pin::from("2")))
            .await;
        tokio_test::assert_err!(result);
        assert_eq!(repo.get("ALPHA1").unwrap().pin_hash, hash_pin(&Pin::from("1")));
        assert_eq!(repo.calls(), 2);
    }
}
