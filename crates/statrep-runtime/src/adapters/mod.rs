//! # Adapters
//!
//! Port implementations connecting the subsystems to real infrastructure.

pub mod metrics;
pub mod storage;

pub use metrics::{prime_workflow_series, publish_stored_totals, PrometheusWorkflowMetrics};
pub use storage::{SqliteStore, StorageError, StoredTotals};
