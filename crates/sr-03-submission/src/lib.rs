//! # SR-03 Submission Workflow
//!
//! Per-session state machine that turns operator events into credential
//! decisions and STATREP inserts.
//!
//! **Subsystem ID:** 03
//!
//! ## Phases
//!
//! ```text
//!              SelectHandle               Verify (ok, permanent PIN)
//! Anonymous ───────────────▶ PinEntered ─────────────────────────────▶ Verified
//!                               │                                        ▲   │
//!                               │ Verify (ok, temporary PIN)     Rotate  │   │ Submit
//!                               ▼                                        │   ▼
//!                         RotationRequired ──────────────────────────────┘ Submitted
//!                                                                        (back to Verified)
//! ```
//!
//! A session is a plain value. [`SubmissionWorkflow::dispatch`] consumes it
//! with one event and hands back the next session plus an [`Effect`], so
//! two overlapping submissions from one session cannot be expressed.
//!
//! ## Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | Temporary PIN blocks submission | `RotationRequired` rejects `Submit` |
//! | Required fields checked before any store call | `SubmissionWorkflow::submit` |
//! | Conditions `A` never persists a checklist | `NewStatusReport::new` |
//! | Write failures always surface | `WorkflowError::Storage` |
//! | Advisory reads degrade | [`Notice`] on the transition |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod metrics;
pub mod workflow;

// Re-exports
pub use domain::{
    check_new_pin, DraftEdit, Effect, Notice, Phase, PolicyViolation, PrefillOutcome,
    ReportDraft, RotationKind, SessionState, Transition, WorkflowError, WorkflowEvent,
};
pub use metrics::{NoOpMetrics, WorkflowMetrics, WorkflowMetricsRecorder, WorkflowMetricsSnapshot};
pub use workflow::{SubmissionWorkflow, WorkflowConfig, DEFAULT_MIN_PIN_LENGTH};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
