//! # Inbound Ports

use crate::domain::{DirectoryError, DirectoryList, DirectorySnapshot, DirectoryWarning};
use async_trait::async_trait;

/// Directory lookup API - inbound port.
#[async_trait]
pub trait DirectoryLookupApi: Send + Sync {
    /// Enrolled handles.
    async fn list_handles(&self) -> Result<Vec<String>, DirectoryError>;

    /// State names.
    async fn list_states(&self) -> Result<Vec<String>, DirectoryError>;

    /// Neighborhood names.
    async fn list_neighborhoods(&self) -> Result<Vec<String>, DirectoryError>;

    /// Administrative add of a state.
    async fn add_state(&self, name: &str) -> Result<(), DirectoryError>;

    /// Administrative add of a neighborhood.
    async fn add_neighborhood(&self, name: &str) -> Result<(), DirectoryError>;

    /// Fetch all three lists. Failures become warnings, never errors.
    async fn load(&self) -> DirectorySnapshot {
        let mut warnings = Vec::new();
        let handles = or_warn(DirectoryList::Handles, self.list_handles().await, &mut warnings);
        let states = or_warn(DirectoryList::States, self.list_states().await, &mut warnings);
        let neighborhoods = or_warn(
            DirectoryList::Neighborhoods,
            self.list_neighborhoods().await,
            &mut warnings,
        );
        DirectorySnapshot {
            handles,
            states,
            neighborhoods,
            warnings,
        }
    }
}

fn or_warn(
    list: DirectoryList,
    result: Result<Vec<String>, DirectoryError>,
    warnings: &mut Vec<DirectoryWarning>,
) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warnings.push(DirectoryWarning {
            list,
            message: e.to_string(),
        });
        Vec::new()
    })
}
