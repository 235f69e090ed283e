//! # Outbound Ports
//!
//! Persistence required by the Report Store.
//!
//! Implementations must return rows in newest-first order and never persist
//! a partial row.

use crate::domain::{NewStatusReport, StatusReport};
use async_trait::async_trait;
use shared_types::{RepositoryError, Timestamp};

/// Report persistence - outbound port.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert one row, assigning the next id.
    async fn insert_report(
        &self,
        report: NewStatusReport,
        created_at: Timestamp,
    ) -> Result<StatusReport, RepositoryError>;

    /// Newest row for a handle.
    async fn last_report_for(&self, handle: &str)
        -> Result<Option<StatusReport>, RepositoryError>;

    /// Newest rows for a location, at most `limit`.
    async fn reports_by_location(
        &self,
        state: &str,
        neighborhood: &str,
        limit: usize,
    ) -> Result<Vec<StatusReport>, RepositoryError>;

    /// All rows for a handle.
    async fn reports_for(&self, handle: &str) -> Result<Vec<StatusReport>, RepositoryError>;

    /// Newest rows across the table, at most `limit`.
    async fn recent_reports(&self, limit: usize) -> Result<Vec<StatusReport>, RepositoryError>;
}
