//! # Prometheus Workflow Metrics
//!
//! Bridges workflow decisions to the process-wide Prometheus registry, and
//! publishes the database row counts as gauges.

use sr_01_credentials::VerificationOutcome;
use sr_02_reports::Conditions;
use sr_03_submission::{PolicyViolation, RotationKind, WorkflowError, WorkflowMetricsRecorder};
use sr_telemetry::{
    metric_inc, HANDLES_ENROLLED, REPORTS_STORED, REPORTS_SUBMITTED, ROTATIONS, VERIFICATIONS,
    WORKFLOW_REJECTIONS,
};

use crate::adapters::storage::StoredTotals;

const OUTCOMES: [VerificationOutcome; 5] = [
    VerificationOutcome::Verified,
    VerificationOutcome::Mismatch,
    VerificationOutcome::UnknownHandle,
    VerificationOutcome::EmptyPin,
    VerificationOutcome::LookupError,
];
const ROTATION_KINDS: [RotationKind; 2] = [RotationKind::Forced, RotationKind::Voluntary];
const CONDITIONS: [Conditions; 3] = [Conditions::A, Conditions::B, Conditions::C];

/// Recorder that increments the `sr_*_total` counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusWorkflowMetrics;

impl WorkflowMetricsRecorder for PrometheusWorkflowMetrics {
    fn record_verification(&self, outcome: VerificationOutcome) {
        metric_inc!(VERIFICATIONS, &[outcome.as_str()]);
    }

    fn record_rotation(&self, kind: RotationKind) {
        metric_inc!(ROTATIONS, &[kind.as_str()]);
    }

    fn record_submission(&self, conditions: Conditions) {
        metric_inc!(REPORTS_SUBMITTED, &[conditions.code()]);
    }

    fn record_rejection(&self, error: &WorkflowError) {
        metric_inc!(WORKFLOW_REJECTIONS, &[error.kind()]);
    }
}

/// Create every known label series so a fresh process exports zeroes
/// instead of nothing.
pub fn prime_workflow_series() {
    for outcome in OUTCOMES {
        VERIFICATIONS.with_label_values(&[outcome.as_str()]);
    }
    for kind in ROTATION_KINDS {
        ROTATIONS.with_label_values(&[kind.as_str()]);
    }
    for conditions in CONDITIONS {
        REPORTS_SUBMITTED.with_label_values(&[conditions.code()]);
    }
    let rejections = [
        WorkflowError::InvalidCredential,
        WorkflowError::Validation { field: "handle" },
        WorkflowError::Storage(String::new()),
        WorkflowError::Policy(PolicyViolation::RotationPending),
        WorkflowError::InvalidTransition {
            event: "submit",
            phase: "anonymous",
        },
    ];
    for error in &rejections {
        WORKFLOW_REJECTIONS.with_label_values(&[error.kind()]);
    }
}

/// Set the stored-row gauges from a database count.
pub fn publish_stored_totals(totals: &StoredTotals) {
    HANDLES_ENROLLED.set(gauge_value(totals.handles));
    for conditions in CONDITIONS {
        REPORTS_STORED.with_label_values(&[conditions.code()]).set(0);
    }
    for (code, count) in &totals.reports_by_conditions {
        REPORTS_STORED
            .with_label_values(&[code.as_str()])
            .set(gauge_value(*count));
    }
}

fn gauge_value(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
