//! # Submission Workflow
//!
//! Event dispatcher over a [`SessionState`] value. The workflow owns no
//! session data; it holds the two stores, configuration, a clock and a
//! metrics recorder.

use crate::domain::{
    check_new_pin, DraftEdit, Effect, Notice, Phase, PolicyViolation, PrefillOutcome,
    ReportDraft, RotationKind, SessionState, Transition, WorkflowError, WorkflowEvent,
};
use crate::metrics::{NoOpMetrics, WorkflowMetricsRecorder};
use shared_types::{DatetimeGroup, Pin, SystemTimeSource, TimeSource};
use sr_01_credentials::{CredentialError, CredentialStoreApi};
use sr_02_reports::ReportStoreApi;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Minimum accepted PIN length.
pub const DEFAULT_MIN_PIN_LENGTH: usize = 4;

/// Default civil offset for generated date-time groups (UTC-6).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -360;

/// Workflow configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Minimum new-PIN length in characters.
    pub min_pin_length: usize,
    /// Minutes east of UTC used to stamp default date-time groups.
    pub utc_offset_minutes: i32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            min_pin_length: DEFAULT_MIN_PIN_LENGTH,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

/// The submission state machine.
pub struct SubmissionWorkflow<C, R>
where
    C: CredentialStoreApi,
    R: ReportStoreApi,
{
    credentials: C,
    reports: R,
    config: WorkflowConfig,
    time_source: Arc<dyn TimeSource>,
    metrics: Arc<dyn WorkflowMetricsRecorder>,
}

impl<C, R> SubmissionWorkflow<C, R>
where
    C: CredentialStoreApi,
    R: ReportStoreApi,
{
    /// Create a workflow with the system clock and no metrics.
    pub fn new(credentials: C, reports: R, config: WorkflowConfig) -> Self {
        Self {
            credentials,
            reports,
            config,
            time_source: Arc::new(SystemTimeSource),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Replace the clock.
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Replace the metrics recorder.
    pub fn with_metrics(mut self, metrics: Arc<dyn WorkflowMetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Credential store.
    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    /// Report store.
    pub fn reports(&self) -> &R {
        &self.reports
    }

    /// Active configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Date-time group for "now" in the configured civil zone.
    pub fn default_datetime_group(&self) -> DatetimeGroup {
        DatetimeGroup::at_offset(self.time_source.now(), self.config.utc_offset_minutes)
    }

    /// Fresh anonymous session.
    pub fn start_session(&self) -> SessionState {
        SessionState::new(self.default_datetime_group())
    }

    /// Apply one event to a session.
    pub async fn dispatch(&self, session: SessionState, event: WorkflowEvent) -> Transition {
        let event_name = event.name();
        let transition = match event {
            WorkflowEvent::SelectHandle(handle) => self.select_handle(session, handle),
            WorkflowEvent::EnterPin(pin) => self.enter_pin(session, pin),
            WorkflowEvent::Edit(edit) => self.edit(session, edit),
            WorkflowEvent::Verify => self.verify(session).await,
            WorkflowEvent::Rotate {
                new_pin,
                confirm_pin,
            } => self.rotate(session, new_pin, confirm_pin).await,
            WorkflowEvent::ChangePin {
                current_pin,
                new_pin,
                confirm_pin,
            } => {
                self.change_pin(session, current_pin, new_pin, confirm_pin)
                    .await
            }
            WorkflowEvent::Submit => self.submit(session).await,
            WorkflowEvent::Clear => Transition::new(self.start_session(), Effect::Cleared),
        };

        if let Some(error) = transition.error() {
            self.metrics.record_rejection(error);
            warn!(
                event = event_name,
                phase = %transition.session.phase,
                kind = error.kind(),
                "[sr-03] Event rejected: {}",
                error
            );
        }
        transition
    }

    fn select_handle(&self, mut session: SessionState, handle: String) -> Transition {
        let handle = handle.trim();
        if handle.is_empty() {
            session.phase = Phase::Anonymous;
            session.handle = None;
            session.pin = Pin::default();
            return Transition::new(session, Effect::None);
        }
        if session.handle() == Some(handle) {
            return Transition::new(session, Effect::None);
        }

        debug!(handle, "[sr-03] Handle selected");
        session.handle = Some(handle.to_string());
        session.pin = Pin::default();
        session.phase = Phase::PinEntered;
        Transition::new(session, Effect::None)
    }

    fn enter_pin(&self, mut session: SessionState, pin: Pin) -> Transition {
        session.pin = pin;
        Transition::new(session, Effect::None)
    }

    fn edit(&self, mut session: SessionState, edit: DraftEdit) -> Transition {
        session.draft.apply(edit);
        Transition::new(session, Effect::None)
    }

    async fn verify(&self, mut session: SessionState) -> Transition {
        let Some(handle) = session.handle().map(str::to_owned) else {
            return Transition::rejected(session, WorkflowError::Validation { field: "handle" });
        };
        if session.pin.is_empty() {
            return Transition::rejected(session, WorkflowError::Validation { field: "pin" });
        }

        if !self.check_credential(&handle, &session.pin).await {
            session.phase = Phase::PinEntered;
            return Transition::rejected(session, WorkflowError::InvalidCredential);
        }

        if self.credentials.is_temporary(&session.pin) {
            info!(handle = %handle, "[sr-03] Temporary PIN, rotation required");
            session.phase = Phase::RotationRequired;
            return Transition::new(session, Effect::RotationRequired);
        }

        let (prefill, notices) = self.prefill(&handle, &mut session.draft).await;
        session.phase = Phase::Verified;
        Transition::new(session, Effect::Verified { prefill }).with_notices(notices)
    }

    async fn rotate(&self, mut session: SessionState, new_pin: Pin, confirm_pin: Pin) -> Transition {
        if session.phase != Phase::RotationRequired {
            let phase = session.phase.as_str();
            return Transition::rejected(
                session,
                WorkflowError::InvalidTransition {
                    event: "rotate",
                    phase,
                },
            );
        }
        let Some(handle) = session.handle().map(str::to_owned) else {
            return Transition::rejected(session, WorkflowError::Validation { field: "handle" });
        };

        if let Err(violation) =
            check_new_pin(&new_pin, &confirm_pin, None, self.config.min_pin_length)
        {
            return Transition::rejected(session, violation.into());
        }

        if let Err(e) = self.credentials.rotate(&handle, &new_pin).await {
            return Transition::rejected(session, WorkflowError::Storage(storage_message(e)));
        }
        self.metrics.record_rotation(RotationKind::Forced);
        info!(handle = %handle, "[sr-03] Temporary PIN replaced");

        session.pin = new_pin;
        let (prefill, notices) = self.prefill(&handle, &mut session.draft).await;
        session.phase = Phase::Verified;
        Transition::new(session, Effect::PinRotated { prefill }).with_notices(notices)
    }

    async fn change_pin(
        &self,
        mut session: SessionState,
        current_pin: Pin,
        new_pin: Pin,
        confirm_pin: Pin,
    ) -> Transition {
        let Some(handle) = session.handle().map(str::to_owned) else {
            return Transition::rejected(session, WorkflowError::Validation { field: "handle" });
        };

        if !self.check_credential(&handle, &current_pin).await {
            return Transition::rejected(session, WorkflowError::InvalidCredential);
        }

        if let Err(violation) = check_new_pin(
            &new_pin,
            &confirm_pin,
            Some(&current_pin),
            self.config.min_pin_length,
        ) {
            return Transition::rejected(session, violation.into());
        }

        if let Err(e) = self.credentials.rotate(&handle, &new_pin).await {
            return Transition::rejected(session, WorkflowError::Storage(storage_message(e)));
        }
        self.metrics.record_rotation(RotationKind::Voluntary);
        info!(handle = %handle, "[sr-03] PIN changed");

        session.pin = new_pin;
        if session.phase != Phase::RotationRequired {
            return Transition::new(session, Effect::PinChanged { prefill: None });
        }

        let (prefill, notices) = self.prefill(&handle, &mut session.draft).await;
        session.phase = Phase::Verified;
        Transition::new(
            session,
            Effect::PinChanged {
                prefill: Some(prefill),
            },
        )
        .with_notices(notices)
    }

    async fn submit(&self, mut session: SessionState) -> Transition {
        if session.phase == Phase::RotationRequired {
            return Transition::rejected(session, PolicyViolation::RotationPending.into());
        }

        let Some(handle) = session.handle().map(str::to_owned) else {
            return Transition::rejected(session, WorkflowError::Validation { field: "handle" });
        };
        if session.pin.is_empty() {
            return Transition::rejected(session, WorkflowError::Validation { field: "pin" });
        }
        if let Some(field) = session.draft.first_blank_field() {
            return Transition::rejected(session, WorkflowError::Validation { field });
        }

        if session.phase != Phase::Verified {
            if !self.check_credential(&handle, &session.pin).await {
                session.phase = Phase::PinEntered;
                return Transition::rejected(session, WorkflowError::InvalidCredential);
            }
            if self.credentials.is_temporary(&session.pin) {
                info!(handle = %handle, "[sr-03] Temporary PIN at submit, rotation required");
                session.phase = Phase::RotationRequired;
                return Transition::new(session, Effect::RotationRequired);
            }
        }

        let report = session.draft.to_report(&handle);
        let id = match self.reports.insert(report.clone()).await {
            Ok(id) => id,
            Err(e) => {
                return Transition::rejected(session, WorkflowError::Storage(e.to_string()));
            }
        };
        self.metrics.record_submission(report.conditions);
        info!(
            handle = %handle,
            id = id.0,
            conditions = report.conditions.code(),
            "[sr-03] STATREP submitted"
        );

        let mut notices = Vec::new();
        if !self.credentials.touch_last_used(&handle).await {
            notices.push(Notice::LastUsedNotUpdated);
        }

        session.draft = ReportDraft::new(self.default_datetime_group());
        session.pin = Pin::default();
        session.phase = Phase::Verified;
        Transition::new(session, Effect::Submitted { id, report }).with_notices(notices)
    }

    async fn check_credential(&self, handle: &str, pin: &Pin) -> bool {
        let outcome = self.credentials.verify_detailed(handle, pin).await;
        self.metrics.record_verification(outcome);
        outcome.is_verified()
    }

    async fn prefill(
        &self,
        handle: &str,
        draft: &mut ReportDraft,
    ) -> (PrefillOutcome, Vec<Notice>) {
        match self.reports.last_for(handle).await {
            Ok(Some(last)) => {
                draft.prefill_from(&last);
                debug!(handle, from = %last.datetime_group(), "[sr-03] Draft pre-filled");
                (
                    PrefillOutcome::Filled {
                        from: last.datetime_group().clone(),
                    },
                    Vec::new(),
                )
            }
            Ok(None) => (PrefillOutcome::NoHistory, Vec::new()),
            Err(e) => {
                warn!(handle, error = %e, "[sr-03] Pre-fill unavailable");
                (
                    PrefillOutcome::Unavailable,
                    vec![Notice::PrefillUnavailable(e.to_string())],
                )
            }
        }
    }
}

fn storage_message(error: CredentialError) -> String {
    match error {
        CredentialError::Storage(e) => e.to_string(),
        other => other.to_string(),
    }
}
