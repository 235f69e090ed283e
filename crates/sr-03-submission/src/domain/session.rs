//! # Session State
//!
//! Everything one operator session remembers between events.

use shared_types::{DatetimeGroup, Handle, Pin};
use sr_02_reports::{Checklist, Conditions, NewStatusReport, StatusReport};
use std::fmt;

/// Authentication phase of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No handle selected.
    #[default]
    Anonymous,
    /// Handle selected, not verified in this session.
    PinEntered,
    /// Handle and PIN verified.
    Verified,
    /// Verified with a temporary PIN; rotation must happen before submitting.
    RotationRequired,
}

impl Phase {
    /// Stable name for logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Anonymous => "anonymous",
            Phase::PinEntered => "pin_entered",
            Phase::Verified => "verified",
            Phase::RotationRequired => "rotation_required",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report fields being edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportDraft {
    /// Date-time group, defaults to "now" in the configured civil zone.
    pub datetime_group: DatetimeGroup,
    /// State name.
    pub state: String,
    /// Neighborhood name.
    pub neighborhood: String,
    /// Free-text location.
    pub location: String,
    /// Overall conditions, `A` by default.
    pub conditions: Conditions,
    /// Checklist as typed; ignored on submit when conditions is `A`.
    pub checklist: Checklist,
}

impl ReportDraft {
    /// Empty draft stamped with a date-time group.
    pub fn new(datetime_group: DatetimeGroup) -> Self {
        Self {
            datetime_group,
            ..Default::default()
        }
    }

    /// Copy location fields from an earlier report.
    pub fn prefill_from(&mut self, last: &StatusReport) {
        self.state = last.report.state.clone();
        self.neighborhood = last.report.neighborhood.clone();
        self.location = last.report.location.clone();
    }

    /// First blank required draft field.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.datetime_group.is_blank() {
            Some("datetime_group")
        } else if self.state.trim().is_empty() {
            Some("state")
        } else if self.neighborhood.trim().is_empty() {
            Some("neighborhood")
        } else if self.location.trim().is_empty() {
            Some("location")
        } else {
            None
        }
    }

    /// Build the record to insert for `handle`.
    pub fn to_report(&self, handle: &str) -> NewStatusReport {
        let checklist = self
            .conditions
            .allows_checklist()
            .then(|| self.checklist.clone());
        NewStatusReport::new(
            handle,
            self.datetime_group.clone(),
            self.state.clone(),
            self.neighborhood.clone(),
            self.location.clone(),
            self.conditions,
            checklist,
        )
    }
}

/// One edit to the draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftEdit {
    /// Replace the date-time group.
    DatetimeGroup(DatetimeGroup),
    /// Replace the state.
    State(String),
    /// Replace the neighborhood.
    Neighborhood(String),
    /// Replace the location.
    Location(String),
    /// Replace the conditions code.
    Conditions(Conditions),
    /// Replace the whole checklist.
    Checklist(Checklist),
}

impl ReportDraft {
    /// Apply one edit.
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::DatetimeGroup(value) => self.datetime_group = value,
            DraftEdit::State(value) => self.state = value,
            DraftEdit::Neighborhood(value) => self.neighborhood = value,
            DraftEdit::Location(value) => self.location = value,
            DraftEdit::Conditions(value) => self.conditions = value,
            DraftEdit::Checklist(value) => self.checklist = value,
        }
    }
}

/// Per-session state. Owned by the presentation layer and threaded through
/// `SubmissionWorkflow::dispatch`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current phase.
    pub phase: Phase,
    /// Selected handle.
    pub handle: Option<Handle>,
    /// PIN field contents.
    pub pin: Pin,
    /// Report being edited.
    pub draft: ReportDraft,
}

impl SessionState {
    /// Fresh session with a draft stamped `datetime_group`.
    pub fn new(datetime_group: DatetimeGroup) -> Self {
        Self {
            draft: ReportDraft::new(datetime_group),
            ..Default::default()
        }
    }

    /// Whether the PIN was verified during this session.
    pub fn pin_verified(&self) -> bool {
        matches!(self.phase, Phase::Verified | Phase::RotationRequired)
    }

    /// Whether a temporary PIN awaits rotation.
    pub fn temp_pin_pending_rotation(&self) -> bool {
        self.phase == Phase::RotationRequired
    }

    /// Selected handle, if non-blank.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref().filter(|h| !h.trim().is_empty())
    }
}
