//! Prometheus metrics for STATREP subsystems.
//!
//! Counters follow the naming convention `sr_<subsystem>_<metric>_total` and
//! count events in this process. Gauges mirror what the database holds.

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // CREDENTIAL METRICS (Subsystem 1)
    // =========================================================================

    /// Verification attempts by outcome
    pub static ref VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("sr_credentials_verifications_total", "PIN verification attempts"),
        &["outcome"]  // verified/mismatch/unknown_handle/empty_pin/lookup_error
    ).expect("metric creation failed");

    /// Successful PIN replacements by kind
    pub static ref ROTATIONS: CounterVec = CounterVec::new(
        Opts::new("sr_credentials_rotations_total", "PIN rotations"),
        &["kind"]  // forced/voluntary
    ).expect("metric creation failed");

    /// Handles with a stored credential
    pub static ref HANDLES_ENROLLED: IntGauge = IntGauge::new(
        "sr_credentials_enrolled_handles", "Handles with a stored credential"
    ).expect("metric creation failed");

    // =========================================================================
    // REPORT METRICS (Subsystem 2)
    // =========================================================================

    /// Stored reports by conditions code
    pub static ref REPORTS_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("sr_reports_submitted_total", "STATREPs stored"),
        &["conditions"]
    ).expect("metric creation failed");

    /// Reports held in the database by conditions code
    pub static ref REPORTS_STORED: IntGaugeVec = IntGaugeVec::new(
        Opts::new("sr_reports_stored", "STATREPs held in the database"),
        &["conditions"]
    ).expect("metric creation failed");

    // =========================================================================
    // WORKFLOW METRICS (Subsystem 3)
    // =========================================================================

    /// Rejected workflow events by error kind
    pub static ref WORKFLOW_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("sr_workflow_rejections_total", "Workflow events rejected"),
        &["kind"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(VERIFICATIONS.clone()),
        Box::new(ROTATIONS.clone()),
        Box::new(HANDLES_ENROLLED.clone()),
        Box::new(REPORTS_SUBMITTED.clone()),
        Box::new(REPORTS_STORED.clone()),
        Box::new(WORKFLOW_REJECTIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_gather_contains_counters() {
        register_metrics().unwrap();
        REPORTS_SUBMITTED.with_label_values(&["B"]).inc();
        let text = gather_metrics().unwrap();
        assert!(text.contains("sr_reports_submitted_total"));
        assert!(text.contains("conditions=\"B\""));
    }

    #[test]
    fn test_gauges_are_exported() {
        register_metrics().unwrap();
        REPORTS_STORED.with_label_values(&["A"]).set(3);
        let text = gather_metrics().unwrap();
        assert!(text.contains("sr_reports_stored{conditions=\"A\"} 3"));
        assert!(text.contains("sr_credentials_enrolled_handles"));
    }
}
