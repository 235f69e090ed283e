//! Static Directory
//!
//! `DirectoryRepository` over in-memory sorted sets, with per-list failure
//! injection.

use crate::ports::outbound::DirectoryRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::RepositoryError;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory directory.
#[derive(Default)]
pub struct StaticDirectory {
    handles: RwLock<BTreeSet<String>>,
    states: RwLock<BTreeSet<String>>,
    neighborhoods: RwLock<BTreeSet<String>>,
    fail_handles: AtomicBool,
    fail_states: AtomicBool,
    fail_neighborhoods: AtomicBool,
}

impl StaticDirectory {
    /// Build a directory from three lists.
    pub fn new<H, S, N>(handles: H, states: S, neighborhoods: N) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            handles: RwLock::new(handles.into_iter().map(Into::into).collect()),
            states: RwLock::new(states.into_iter().map(Into::into).collect()),
            neighborhoods: RwLock::new(neighborhoods.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    /// Make handle loading fail.
    pub fn set_fail_handles(&self, fail: bool) {
        self.fail_handles.store(fail, Ordering::SeqCst);
    }

    /// Make state loading fail.
    pub fn set_fail_states(&self, fail: bool) {
        self.fail_states.store(fail, Ordering::SeqCst);
    }

    /// Make neighborhood loading fail.
    pub fn set_fail_neighborhoods(&self, fail: bool) {
        self.fail_neighborhoods.store(fail, Ordering::SeqCst);
    }
}

fn read(
    set: &RwLock<BTreeSet<String>>,
    fail: &AtomicBool,
    table: &str,
) -> Result<Vec<String>, RepositoryError> {
    if fail.load(Ordering::SeqCst) {
        return Err(RepositoryError::Unavailable(format!("{table} table offline")));
    }
    Ok(set.read().iter().cloned().collect())
}

fn insert(set: &RwLock<BTreeSet<String>>, name: &str) -> Result<(), RepositoryError> {
    if set.write().insert(name.to_string()) {
        Ok(())
    } else {
        Err(RepositoryError::Conflict(name.to_string()))
    }
}

#[async_trait]
impl DirectoryRepository for StaticDirectory {
    async fn load_handles(&self) -> Result<Vec<String>, RepositoryError> {
        read(&self.handles, &self.fail_handles, "handles")
    }

    async fn load_states(&self) -> Result<Vec<String>, RepositoryError> {
        read(&self.states, &self.fail_states, "states")
    }

    async fn load_neighborhoods(&self) -> Result<Vec<String>, RepositoryError> {
        read(&self.neighborhoods, &self.fail_neighborhoods, "neighborhoods")
    }

    async fn insert_state(&self, name: &str) -> Result<(), RepositoryError> {
        insert(&self.states, name)
    }

    async fn insert_neighborhood(&self, name: &str) -> Result<(), RepositoryError> {
        insert(&self.neighborhoods, name)
    }
}
