//! # Outbound Ports

use async_trait::async_trait;
use shared_types::RepositoryError;

/// Directory persistence - outbound port.
///
/// Lists are returned in ascending lexical order.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Enrolled handles.
    async fn load_handles(&self) -> Result<Vec<String>, RepositoryError>;

    /// State names.
    async fn load_states(&self) -> Result<Vec<String>, RepositoryError>;

    /// Neighborhood names.
    async fn load_neighborhoods(&self) -> Result<Vec<String>, RepositoryError>;

    /// Add a state. `Conflict` if present.
    async fn insert_state(&self, name: &str) -> Result<(), RepositoryError>;

    /// Add a neighborhood. `Conflict` if present.
    async fn insert_neighborhood(&self, name: &str) -> Result<(), RepositoryError>;
}
