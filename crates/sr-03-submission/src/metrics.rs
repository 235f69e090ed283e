//! Metrics hooks for workflow decisions
//!
//! The workflow reports every verification, rotation, submission and
//! rejection through [`WorkflowMetricsRecorder`]. [`WorkflowMetrics`] keeps
//! in-process counters; the runtime plugs in a Prometheus recorder.

use crate::domain::{RotationKind, WorkflowError};
use sr_01_credentials::VerificationOutcome;
use sr_02_reports::Conditions;
use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for metrics recording implementations
pub trait WorkflowMetricsRecorder: Send + Sync {
    /// Record a verification attempt
    fn record_verification(&self, outcome: VerificationOutcome);

    /// Record a successful PIN replacement
    fn record_rotation(&self, kind: RotationKind);

    /// Record a stored report
    fn record_submission(&self, conditions: Conditions);

    /// Record a rejected event
    fn record_rejection(&self, error: &WorkflowError);
}

/// In-process counters
#[derive(Default)]
pub struct WorkflowMetrics {
    /// Verification attempts
    pub verifications: AtomicU64,
    /// Successful verifications
    pub verifications_ok: AtomicU64,
    /// Forced rotations
    pub forced_rotations: AtomicU64,
    /// Voluntary changes
    pub voluntary_rotations: AtomicU64,
    /// Stored reports
    pub submissions: AtomicU64,
    /// Rejected events
    pub rejections: AtomicU64,
}

impl WorkflowMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> WorkflowMetricsSnapshot {
        WorkflowMetricsSnapshot {
            verifications: self.verifications.load(Ordering::Relaxed),
            verifications_ok: self.verifications_ok.load(Ordering::Relaxed),
            forced_rotations: self.forced_rotations.load(Ordering::Relaxed),
            voluntary_rotations: self.voluntary_rotations.load(Ordering::Relaxed),
            submissions: self.submissions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
        }
    }
}

impl WorkflowMetricsRecorder for WorkflowMetrics {
    fn record_verification(&self, outcome: VerificationOutcome) {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        if outcome.is_verified() {
            self.verifications_ok.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_rotation(&self, kind: RotationKind) {
        match kind {
            RotationKind::Forced => self.forced_rotations.fetch_add(1, Ordering::Relaxed),
            RotationKind::Voluntary => self.voluntary_rotations.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn record_submission(&self, _conditions: Conditions) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejection(&self, _error: &WorkflowError) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowMetricsSnapshot {
    /// Verification attempts
    pub verifications: u64,
    /// Successful verifications
    pub verifications_ok: u64,
    /// Forced rotations
    pub forced_rotations: u64,
    /// Voluntary changes
    pub voluntary_rotations: u64,
    /// Stored reports
    pub submissions: u64,
    /// Rejected events
    pub rejections: u64,
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl WorkflowMetricsRecorder for NoOpMetrics {
    fn record_verification(&self, _outcome: VerificationOutcome) {}
    fn record_rotation(&self, _kind: RotationKind) {}
    fn record_submission(&self, _conditions: Conditions) {}
    fn record_rejection(&self, _error: &WorkflowError) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counts() {
        let metrics = WorkflowMetrics::new();
        metrics.record_verification(VerificationOutcome::Verified);
        metrics.record_verification(VerificationOutcome::Mismatch);
        metrics.record_rotation(RotationKind::Forced);
        metrics.record_submission(Conditions::B);
        metrics.record_rejection(&WorkflowError::InvalidCredential);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.verifications, 2);
        assert_eq!(snapshot.verifications_ok, 1);
        assert_eq!(snapshot.forced_rotations, 1);
        assert_eq!(snapshot.voluntary_rotations, 0);
        assert_eq!(snapshot.submissions, 1);
        assert_eq!(snapshot.rejections, 1);
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_verification(VerificationOutcome::Verified);
        metrics.record_submission(Conditions::A);
    }
}
