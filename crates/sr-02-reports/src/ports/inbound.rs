//! # Inbound Ports
//!
//! API trait defining what the Report Store can do.

use crate::domain::{NewStatusReport, ReportError, ReportId, StatusReport};
use async_trait::async_trait;

/// Report store API - inbound port.
///
/// All multi-row results are ordered newest first (see
/// [`crate::domain::newest_first`]).
#[async_trait]
pub trait ReportStoreApi: Send + Sync {
    /// Persist a report atomically and return its generated id.
    async fn insert(&self, report: NewStatusReport) -> Result<ReportId, ReportError>;

    /// Most recent report for a handle, if any.
    async fn last_for(&self, handle: &str) -> Result<Option<StatusReport>, ReportError>;

    /// Up to `limit` reports filed from one state and neighborhood.
    async fn recent_by_location(
        &self,
        state: &str,
        neighborhood: &str,
        limit: usize,
    ) -> Result<Vec<StatusReport>, ReportError>;

    /// Every report filed by a handle.
    async fn history_for(&self, handle: &str) -> Result<Vec<StatusReport>, ReportError>;

    /// Up to `limit` reports across all handles.
    async fn recent(&self, limit: usize) -> Result<Vec<StatusReport>, ReportError>;
}
