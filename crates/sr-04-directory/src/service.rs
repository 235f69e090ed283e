//! # Directory Service
//!
//! Implements `DirectoryLookupApi` on top of any `DirectoryRepository`.

use crate::domain::DirectoryError;
use crate::ports::inbound::DirectoryLookupApi;
use crate::ports::outbound::DirectoryRepository;
use async_trait::async_trait;
use shared_types::RepositoryError;
use std::sync::Arc;
use tracing::{info, warn};

/// The Directory Lookup service.
pub struct DirectoryService<R: DirectoryRepository> {
    repository: Arc<R>,
}

impl<R: DirectoryRepository> DirectoryService<R> {
    /// Create a service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }
}

fn logged(list: &str, result: Result<Vec<String>, RepositoryError>) -> Result<Vec<String>, DirectoryError> {
    result.map_err(|e| {
        warn!(list, error = %e, "[sr-04] Directory list unavailable");
        DirectoryError::from(e)
    })
}

fn validated(kind: &str, name: &str) -> Result<String, DirectoryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectoryError::Validation(format!("{kind} name is empty")));
    }
    Ok(name.to_string())
}

#[async_trait]
impl<R: DirectoryRepository> DirectoryLookupApi for DirectoryService<R> {
    async fn list_handles(&self) -> Result<Vec<String>, DirectoryError> {
        logged("handles", self.repository.load_handles().await)
    }

    async fn list_states(&self) -> Result<Vec<String>, DirectoryError> {
        logged("states", self.repository.load_states().await)
    }

    async fn list_neighborhoods(&self) -> Result<Vec<String>, DirectoryError> {
        logged("neighborhoods", self.repository.load_neighborhoods().await)
    }

    async fn add_state(&self, name: &str) -> Result<(), DirectoryError> {
        let name = validated("state", name)?;
        self.repository.insert_state(&name).await?;
        info!(state = %name, "[sr-04] State added");
        Ok(())
    }

    async fn add_neighborhood(&self, name: &str) -> Result<(), DirectoryError> {
        let name = validated("neighborhood", name)?;
        self.repository.insert_neighborhood(&name).await?;
        info!(neighborhood = %name, "[sr-04] Neighborhood added");
        Ok(())
    }
}
