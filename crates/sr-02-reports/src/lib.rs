//! # SR-02 Report Store
//!
//! Persistence and ordered lookup of STATREP records.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Ordering
//!
//! Every multi-row query returns reports newest first: `datetime_group`
//! descending, then insertion order descending (higher id first). The same
//! rule picks the single report returned by `last_for`.
//!
//! ## Invariant
//!
//! A report with conditions `A` never carries checklist fields. The domain
//! constructor enforces it and the store re-applies it before persisting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::InMemoryReportRepository;
pub use domain::{
    newest_first, Checklist, ChecklistField, Conditions, NewStatusReport, ReportError, ReportId,
    StatusReport,
};
pub use ports::{ReportRepository, ReportStoreApi};
pub use service::{ReportService, ReportStoreConfig, DEFAULT_MAX_QUERY_LIMIT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
