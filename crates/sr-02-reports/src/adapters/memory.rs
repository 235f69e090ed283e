//! In-Memory Report Repository
//!
//! Implements `ReportRepository` over a `Vec` guarded by one write lock, so
//! id assignment and append happen together.

use crate::domain::{newest_first, NewStatusReport, ReportId, StatusReport};
use crate::ports::outbound::ReportRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{RepositoryError, Timestamp};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct Table {
    rows: Vec<StatusReport>,
    next_id: i64,
}

/// In-memory STATREP table.
#[derive(Default)]
pub struct InMemoryReportRepository {
    table: RwLock<Table>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryReportRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read fail with `Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every insert fail with `Database`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of port calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored row in insertion order.
    pub fn rows(&self) -> Vec<StatusReport> {
        self.table.read().rows.clone()
    }

    fn check_read(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("report store offline".into()));
        }
        Ok(())
    }

    fn select<F>(&self, filter: F, limit: Option<usize>) -> Vec<StatusReport>
    where
        F: Fn(&StatusReport) -> bool,
    {
        let mut rows: Vec<StatusReport> = self
            .table
            .read()
            .rows
            .iter()
            .filter(|r| filter(r))
            .cloned()
            .collect();
        rows.sort_by(newest_first);
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert_report(
        &self,
        report: NewStatusReport,
        created_at: Timestamp,
    ) -> Result<StatusReport, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("statrep insert rejected".into()));
        }

        let mut table = self.table.write();
        table.next_id += 1;
        let stored = StatusReport {
            id: ReportId(table.next_id),
            report,
            created_at,
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn last_report_for(
        &self,
        handle: &str,
    ) -> Result<Option<StatusReport>, RepositoryError> {
        self.check_read()?;
        Ok(self
            .select(|r| r.handle() == handle, Some(1))
            .into_iter()
            .next())
    }

    async fn reports_by_location(
        &self,
        state: &str,
        neighborhood: &str,
        limit: usize,
    ) -> Result<Vec<StatusReport>, RepositoryError> {
        self.check_read()?;
        Ok(self.select(
            |r| r.report.state == state && r.report.neighborhood == neighborhood,
            Some(limit),
        ))
    }

    async fn reports_for(&self, handle: &str) -> Result<Vec<StatusReport>, RepositoryError> {
        self.check_read()?;
        Ok(self.select(|r| r.handle() == handle, None))
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<StatusReport>, RepositoryError> {
        self.check_read()?;
        Ok(self.select(|_| true, Some(limit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Conditions;
    use chrono::Utc;
    use shared_types::DatetimeGroup;

    fn report(handle: &str, dtg: &str) -> NewStatusReport {
        NewStatusReport::new(
            handle,
            DatetimeGroup::from(dtg),
            "Texas",
            "Northside",
            "EM12ab",
            Conditions::A,
            None,
        )
    }

    #[tokio::test]
    async fn test_ids_increase_with_insertion() {
        let repo = InMemoryReportRepository::new();
        let a = repo
            .insert_report(report("ALPHA1", "2025-01-01 10:00"), Utc::now())
            .await
            .unwrap();
        let b = repo
            .insert_report(report("ALPHA1", "2024-01-01 10:00"), Utc::now())
            .await
            .unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_last_report_prefers_datetime_group_over_insertion() {
        let repo = InMemoryReportRepository::new();
        repo.insert_report(report("ALPHA1", "2025-06-01 10:00"), Utc::now())
            .await
            .unwrap();
        repo.insert_report(report("ALPHA1", "2025-01-01 10:00"), Utc::now())
            .await
            .unwrap();
        let last = repo.last_report_for("ALPHA1").await.unwrap().unwrap();
        assert_eq!(last.datetime_group().as_str(), "2025-06-01 10:00");
    }

    #[tokio::test]
    async fn test_failed_insert_stores_nothing() {
        let repo = InMemoryReportRepository::new();
        repo.set_fail_writes(true);
        tokio_test::assert_err!(
            repo.insert_report(report("ALPHA1", "2025-01-01 10:00"), Utc::now())
                .await
        );
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure() {
        let repo = InMemoryReportRepository::new();
        repo.set_fail_reads(true);
        assert!(matches!(
            repo.recent_reports(5).await,
            Err(RepositoryError::Unavailable(_))
        ));
    }
}
