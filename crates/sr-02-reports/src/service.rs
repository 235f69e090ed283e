//! # Report Service
//!
//! Implements `ReportStoreApi` on top of any `ReportRepository`.

use crate::domain::{NewStatusReport, ReportError, ReportId, StatusReport};
use crate::ports::inbound::ReportStoreApi;
use crate::ports::outbound::ReportRepository;
use async_trait::async_trait;
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Default cap on any multi-row query.
pub const DEFAULT_MAX_QUERY_LIMIT: usize = 100;

/// Report store configuration.
#[derive(Clone, Debug)]
pub struct ReportStoreConfig {
    /// Upper bound applied to every caller-supplied limit.
    pub max_query_limit: usize,
}

impl Default for ReportStoreConfig {
    fn default() -> Self {
        Self {
            max_query_limit: DEFAULT_MAX_QUERY_LIMIT,
        }
    }
}

/// The Report Store service.
pub struct ReportService<R: ReportRepository> {
    repository: Arc<R>,
    time_source: Arc<dyn TimeSource>,
    config: ReportStoreConfig,
}

impl<R: ReportRepository> ReportService<R> {
    /// Create a service with default configuration and the system clock.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(
            repository,
            Arc::new(SystemTimeSource),
            ReportStoreConfig::default(),
        )
    }

    /// Create a service with explicit dependencies.
    pub fn with_config(
        repository: Arc<R>,
        time_source: Arc<dyn TimeSource>,
        config: ReportStoreConfig,
    ) -> Self {
        Self {
            repository,
            time_source,
            config,
        }
    }

    /// Underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn effective_limit(&self, limit: usize) -> usize {
        limit.min(self.config.max_query_limit)
    }
}

#[async_trait]
impl<R: ReportRepository> ReportStoreApi for ReportService<R> {
    async fn insert(&self, report: NewStatusReport) -> Result<ReportId, ReportError> {
        let report = report.normalized();
        if let Some(field) = report.first_blank_field() {
            return Err(ReportError::Validation(format!("{field} is required")));
        }

        let handle = report.handle.clone();
        let conditions = report.conditions;
        match self
            .repository
            .insert_report(report, self.time_source.now())
            .await
        {
            Ok(stored) => {
                info!(
                    handle = %handle,
                    id = stored.id.0,
                    conditions = conditions.code(),
                    "[sr-02] STATREP stored"
                );
                Ok(stored.id)
            }
            Err(e) => {
                error!(handle = %handle, error = %e, "[sr-02] STATREP insert failed");
                Err(e.into())
            }
        }
    }

    async fn last_for(&self, handle: &str) -> Result<Option<StatusReport>, ReportError> {
        let last = self.repository.last_report_for(handle).await?;
        debug!(handle, found = last.is_some(), "[sr-02] Last report lookup");
        Ok(last)
    }

    async fn recent_by_location(
        &self,
        state: &str,
        neighborhood: &str,
        limit: usize,
    ) -> Result<Vec<StatusReport>, ReportError> {
        let limit = self.effective_limit(limit);
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .repository
            .reports_by_location(state, neighborhood, limit)
            .await?)
    }

    async fn history_for(&self, handle: &str) -> Result<Vec<StatusReport>, ReportError> {
        Ok(self.repository.reports_for(handle).await?)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StatusReport>, ReportError> {
        let limit = self.effective_limit(limit);
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.repository.recent_reports(limit).await?)
    }
}
