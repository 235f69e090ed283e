//! # Subsystem Wiring
//!
//! Builds every service over a shared [`SqliteStore`].
//!
//! ```text
//! SqliteStore ──┬── CredentialService (sr-01) ──┐
//!               ├── ReportService     (sr-02) ──┴── SubmissionWorkflow (sr-03)
//!               └── DirectoryService  (sr-04)
//! ```

use std::sync::Arc;

use shared_types::{SystemTimeSource, TimeSource};
use sr_01_credentials::CredentialService;
use sr_02_reports::ReportService;
use sr_03_submission::{SubmissionWorkflow, WorkflowMetricsRecorder};
use sr_04_directory::DirectoryService;
use tracing::info;

use crate::adapters::{PrometheusWorkflowMetrics, SqliteStore, StorageError};
use crate::container::config::RuntimeConfig;

/// Credential service over SQLite.
pub type ConcreteCredentialService = CredentialService<SqliteStore>;

/// Report service over SQLite.
pub type ConcreteReportService = ReportService<SqliteStore>;

/// Directory service over SQLite.
pub type ConcreteDirectoryService = DirectoryService<SqliteStore>;

/// Workflow over the SQLite-backed services.
pub type ConcreteWorkflow = SubmissionWorkflow<ConcreteCredentialService, ConcreteReportService>;

/// All services sharing one store.
pub struct StatrepContainer {
    /// Configuration the container was built from.
    pub config: RuntimeConfig,
    /// Shared store.
    pub store: Arc<SqliteStore>,
    /// Submission workflow. Owns the credential and report services.
    pub workflow: ConcreteWorkflow,
    /// Directory lookups.
    pub directory: ConcreteDirectoryService,
}

impl StatrepContainer {
    /// Open the configured database and wire every service to it.
    pub fn open(config: RuntimeConfig) -> Result<Self, StorageError> {
        let store = SqliteStore::open(&config.storage.database_path)?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Wire every service to an existing store, recording Prometheus metrics.
    pub fn with_store(config: RuntimeConfig, store: Arc<SqliteStore>) -> Self {
        Self::build(
            config,
            store,
            Arc::new(SystemTimeSource),
            Arc::new(PrometheusWorkflowMetrics),
        )
    }

    /// Wire with an explicit clock and metrics recorder.
    pub fn build(
        config: RuntimeConfig,
        store: Arc<SqliteStore>,
        time_source: Arc<dyn TimeSource>,
        metrics: Arc<dyn WorkflowMetricsRecorder>,
    ) -> Self {
        let credentials =
            CredentialService::with_time_source(Arc::clone(&store), Arc::clone(&time_source));
        let reports = ReportService::with_config(
            Arc::clone(&store),
            Arc::clone(&time_source),
            config.report_store_config(),
        );
        let workflow = SubmissionWorkflow::new(credentials, reports, config.workflow.clone())
            .with_time_source(time_source)
            .with_metrics(metrics);
        let directory = DirectoryService::new(Arc::clone(&store));

        info!(
            "[sr-runtime] Services wired (min PIN length {}, UTC offset {} min)",
            config.workflow.min_pin_length, config.workflow.utc_offset_minutes
        );

        Self {
            config,
            store,
            workflow,
            directory,
        }
    }

    /// Credential service.
    pub fn credentials(&self) -> &ConcreteCredentialService {
        self.workflow.credentials()
    }

    /// Report service.
    pub fn reports(&self) -> &ConcreteReportService {
        self.workflow.reports()
    }
}
