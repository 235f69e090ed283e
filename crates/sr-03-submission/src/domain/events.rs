//! # Events and Effects

use super::errors::WorkflowError;
use super::session::{DraftEdit, SessionState};
use shared_types::{DatetimeGroup, Pin};
use sr_02_reports::{NewStatusReport, ReportId};

/// Operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Pick a handle (typically from the directory).
    SelectHandle(String),
    /// Type into the PIN field.
    EnterPin(Pin),
    /// Edit a report field.
    Edit(DraftEdit),
    /// Verify the selected handle and PIN.
    Verify,
    /// Complete a forced rotation.
    Rotate {
        /// Proposed PIN.
        new_pin: Pin,
        /// Confirmation.
        confirm_pin: Pin,
    },
    /// Voluntary PIN change.
    ChangePin {
        /// PIN currently in force.
        current_pin: Pin,
        /// Proposed PIN.
        new_pin: Pin,
        /// Confirmation.
        confirm_pin: Pin,
    },
    /// Submit the draft.
    Submit,
    /// Reset the whole session.
    Clear,
}

impl WorkflowEvent {
    /// Stable name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::SelectHandle(_) => "select_handle",
            WorkflowEvent::EnterPin(_) => "enter_pin",
            WorkflowEvent::Edit(_) => "edit",
            WorkflowEvent::Verify => "verify",
            WorkflowEvent::Rotate { .. } => "rotate",
            WorkflowEvent::ChangePin { .. } => "change_pin",
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::Clear => "clear",
        }
    }
}

/// Which path replaced a PIN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationKind {
    /// Temporary PIN replaced after verification.
    Forced,
    /// Operator-initiated change.
    Voluntary,
}

impl RotationKind {
    /// Stable label for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            RotationKind::Forced => "forced",
            RotationKind::Voluntary => "voluntary",
        }
    }
}

/// What pre-fill did after a verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrefillOutcome {
    /// Location fields copied from the report with this date-time group.
    Filled {
        /// Date-time group of the source report.
        from: DatetimeGroup,
    },
    /// First report for this handle; nothing to copy.
    NoHistory,
    /// Lookup failed; draft left as it was.
    Unavailable,
}

/// Non-fatal condition raised while handling an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Last-report lookup failed; carries the store message.
    PrefillUnavailable(String),
    /// `last_used` could not be stamped after a submission.
    LastUsedNotUpdated,
}

/// Observable outcome of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Session updated, nothing else happened.
    None,
    /// Credential verified.
    Verified {
        /// Pre-fill result.
        prefill: PrefillOutcome,
    },
    /// Verified with a temporary PIN; a `Rotate` is required.
    RotationRequired,
    /// Forced rotation completed.
    PinRotated {
        /// Pre-fill result.
        prefill: PrefillOutcome,
    },
    /// Voluntary change completed.
    PinChanged {
        /// Present when the change also completed a forced rotation.
        prefill: Option<PrefillOutcome>,
    },
    /// Report stored.
    Submitted {
        /// Store-generated id.
        id: ReportId,
        /// Record as persisted.
        report: NewStatusReport,
    },
    /// Session reset.
    Cleared,
    /// Event refused; session unchanged unless noted by the rule.
    Rejected(WorkflowError),
}

/// Result of dispatching one event.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Session after the event.
    pub session: SessionState,
    /// What happened.
    pub effect: Effect,
    /// Advisory problems that did not stop the event.
    pub notices: Vec<Notice>,
}

impl Transition {
    pub(crate) fn new(session: SessionState, effect: Effect) -> Self {
        Self {
            session,
            effect,
            notices: Vec::new(),
        }
    }

    pub(crate) fn rejected(session: SessionState, error: WorkflowError) -> Self {
        Self::new(session, Effect::Rejected(error))
    }

    pub(crate) fn with_notices(mut self, notices: Vec<Notice>) -> Self {
        self.notices = notices;
        self
    }

    /// The rejection, if any.
    pub fn error(&self) -> Option<&WorkflowError> {
        match &self.effect {
            Effect::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the event was accepted.
    pub fn is_ok(&self) -> bool {
        self.error().is_none()
    }
}
