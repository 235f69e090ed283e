//! # Operator Scenarios
//!
//! End-to-end sessions driven through `SubmissionWorkflow` over the
//! in-memory adapters of sr-01, sr-02 and sr-04.
//!
//! ## Flows Tested
//!
//! 1. Temporary PIN → forced rotation → new PIN verifies, old does not
//! 2. Conditions A submission persists without checklist
//! 3. Missing neighborhood is rejected before any store call
//! 4. First report for a handle: verified, nothing to pre-fill
//! 5. Sequential submissions keep the handle and verification

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use shared_types::{FixedTimeSource, Pin, TimeSource};
    use sr_01_credentials::{
        hash_pin, Credential, CredentialService, CredentialStoreApi, InMemoryCredentialRepository,
    };
    use sr_02_reports::{
        Checklist, Conditions, InMemoryReportRepository, ReportService, ReportStoreApi,
        ReportStoreConfig,
    };
    use sr_03_submission::{
        DraftEdit, Effect, Notice, Phase, PolicyViolation, PrefillOutcome, SessionState,
        SubmissionWorkflow, Transition, WorkflowConfig, WorkflowError, WorkflowEvent,
        WorkflowMetrics,
    };
    use sr_04_directory::{DirectoryList, DirectoryLookupApi, DirectoryService, StaticDirectory};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    type Workflow = SubmissionWorkflow<
        CredentialService<InMemoryCredentialRepository>,
        ReportService<InMemoryReportRepository>,
    >;

    struct Harness {
        workflow: Workflow,
        credentials: Arc<InMemoryCredentialRepository>,
        reports: Arc<InMemoryReportRepository>,
        metrics: Arc<WorkflowMetrics>,
    }

    fn harness(enrolled: &[(&str, &str)]) -> Harness {
        let clock: Arc<dyn TimeSource> = Arc::new(FixedTimeSource(
            Utc.with_ymd_and_hms(2025, 1, 15, 18, 5, 0).unwrap(),
        ));
        let credentials = Arc::new(InMemoryCredentialRepository::with_credentials(
            enrolled
                .iter()
                .map(|(handle, pin)| Credential::new(*handle, hash_pin(&Pin::from(*pin)))),
        ));
        let reports = Arc::new(InMemoryReportRepository::new());
        let metrics = Arc::new(WorkflowMetrics::new());

        let workflow = SubmissionWorkflow::new(
            CredentialService::with_time_source(Arc::clone(&credentials), Arc::clone(&clock)),
            ReportService::with_config(
                Arc::clone(&reports),
                Arc::clone(&clock),
                ReportStoreConfig::default(),
            ),
            WorkflowConfig::default(),
        )
        .with_time_source(clock)
        .with_metrics(metrics.clone());

        Harness {
            workflow,
            credentials,
            reports,
            metrics,
        }
    }

    async fn run(workflow: &Workflow, mut session: SessionState, events: Vec<WorkflowEvent>) -> Transition {
        let mut last = None;
        for event in events {
            let transition = workflow.dispatch(session, event).await;
            session = transition.session.clone();
            last = Some(transition);
        }
        last.expect("at least one event")
    }

    fn login(handle: &str, pin: &str) -> Vec<WorkflowEvent> {
        vec![
            WorkflowEvent::SelectHandle(handle.to_string()),
            WorkflowEvent::EnterPin(Pin::from(pin)),
            WorkflowEvent::Verify,
        ]
    }

    fn location(state: &str, neighborhood: &str, grid: &str) -> Vec<WorkflowEvent> {
        vec![
            WorkflowEvent::Edit(DraftEdit::State(state.to_string())),
            WorkflowEvent::Edit(DraftEdit::Neighborhood(neighborhood.to_string())),
            WorkflowEvent::Edit(DraftEdit::Location(grid.to_string())),
        ]
    }

    // =========================================================================
    // SCENARIO 1: FORCED ROTATION
    // =========================================================================

    #[tokio::test]
    async fn test_temporary_pin_forces_rotation() {
        let h = harness(&[("ALPHA1", "z9931")]);

        let verified = run(&h.workflow, h.workflow.start_session(), login("ALPHA1", "z9931")).await;
        assert_eq!(verified.effect, Effect::RotationRequired);
        assert_eq!(verified.session.phase, Phase::RotationRequired);

        // submit is refused until the PIN is replaced
        let mut events = location("Texas", "Northside", "EM10dh");
        events.push(WorkflowEvent::Submit);
        let blocked = run(&h.workflow, verified.session, events).await;
        assert_eq!(
            blocked.error(),
            Some(&WorkflowError::Policy(PolicyViolation::RotationPending))
        );
        assert!(h.reports.is_empty());

        let rotated = h
            .workflow
            .dispatch(
                blocked.session,
                WorkflowEvent::Rotate {
                    new_pin: Pin::from("7412"),
                    confirm_pin: Pin::from("7412"),
                },
            )
            .await;
        assert!(matches!(
            rotated.effect,
            Effect::PinRotated {
                prefill: PrefillOutcome::NoHistory
            }
        ));
        assert_eq!(rotated.session.phase, Phase::Verified);

        let credentials = h.workflow.credentials();
        assert!(credentials.verify("ALPHA1", &Pin::from("7412")).await);
        assert!(!credentials.verify("ALPHA1", &Pin::from("z9931")).await);
        assert_eq!(h.metrics.snapshot().forced_rotations, 1);
    }

    #[tokio::test]
    async fn test_rotation_to_another_temporary_pin_is_refused() {
        let h = harness(&[("ALPHA1", "z9931")]);
        let verified = run(&h.workflow, h.workflow.start_session(), login("ALPHA1", "z9931")).await;

        let refused = h
            .workflow
            .dispatch(
                verified.session,
                WorkflowEvent::Rotate {
                    new_pin: Pin::from("Z5555"),
                    confirm_pin: Pin::from("Z5555"),
                },
            )
            .await;
        assert_eq!(
            refused.error(),
            Some(&WorkflowError::Policy(PolicyViolation::ReservedPrefix))
        );
        assert_eq!(refused.session.phase, Phase::RotationRequired);
        assert!(h.workflow.credentials().verify("ALPHA1", &Pin::from("z9931")).await);
    }

    // =========================================================================
    // SCENARIO 2: CONDITIONS A DROPS THE CHECKLIST
    // =========================================================================

    #[tokio::test]
    async fn test_conditions_a_submission_has_no_checklist() {
        let h = harness(&[("BRAVO2", "5521")]);

        let mut events = login("BRAVO2", "5521");
        events.extend(location("Texas", "Northside", "EM10dh"));
        events.push(WorkflowEvent::Edit(DraftEdit::Checklist(Checklist {
            water: Some("N".into()),
            comments: Some("typed before switching to A".into()),
            ..Default::default()
        })));
        events.push(WorkflowEvent::Edit(DraftEdit::Conditions(Conditions::A)));
        events.push(WorkflowEvent::Submit);

        let submitted = run(&h.workflow, h.workflow.start_session(), events).await;
        let Effect::Submitted { id, report } = &submitted.effect else {
            panic!("expected submission, got {:?}", submitted.effect);
        };
        assert!(report.checklist.is_none());

        let rows = h.reports.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, *id);
        assert_eq!(rows[0].report.conditions, Conditions::A);
        assert!(rows[0].report.checklist.is_none());
        assert_eq!(rows[0].report.datetime_group.as_str(), "2025-01-15 12:05");
    }

    #[tokio::test]
    async fn test_conditions_c_keeps_checklist() {
        let h = harness(&[("BRAVO2", "5521")]);

        let mut events = login("BRAVO2", "5521");
        events.extend(location("Texas", "Northside", "EM10dh"));
        events.push(WorkflowEvent::Edit(DraftEdit::Conditions(Conditions::C)));
        events.push(WorkflowEvent::Edit(DraftEdit::Checklist(Checklist {
            commercial_power: Some("N".into()),
            ..Default::default()
        })));
        events.push(WorkflowEvent::Submit);

        let submitted = run(&h.workflow, h.workflow.start_session(), events).await;
        assert!(submitted.is_ok());
        let stored = h.reports.rows();
        let checklist = stored[0].report.checklist.as_ref().unwrap();
        assert_eq!(checklist.commercial_power.as_deref(), Some("N"));
        assert_eq!(h.metrics.snapshot().submissions, 1);
    }

    // =========================================================================
    // SCENARIO 3: VALIDATION BEFORE STORAGE
    // =========================================================================

    #[tokio::test]
    async fn test_missing_neighborhood_never_reaches_the_store() {
        let h = harness(&[("CHARLIE3", "8080")]);

        let mut events = login("CHARLIE3", "8080");
        events.push(WorkflowEvent::Edit(DraftEdit::State("Texas".into())));
        events.push(WorkflowEvent::Edit(DraftEdit::Location("EM10dh".into())));
        let ready = run(&h.workflow, h.workflow.start_session(), events).await;

        let report_calls = h.reports.calls();
        let credential_calls = h.credentials.calls();
        let rejected = h.workflow.dispatch(ready.session.clone(), WorkflowEvent::Submit).await;

        assert_eq!(
            rejected.error(),
            Some(&WorkflowError::Validation {
                field: "neighborhood"
            })
        );
        assert_eq!(rejected.session, ready.session);
        assert_eq!(h.reports.calls(), report_calls);
        assert_eq!(h.credentials.calls(), credential_calls);
        assert_eq!(h.metrics.snapshot().rejections, 1);
    }

    // =========================================================================
    // SCENARIO 4: FIRST REPORT
    // =========================================================================

    #[tokio::test]
    async fn test_first_report_verifies_with_empty_draft() {
        let h = harness(&[("CHARLIE3", "8080")]);

        let verified = run(&h.workflow, h.workflow.start_session(), login("CHARLIE3", "8080")).await;
        assert_eq!(
            verified.effect,
            Effect::Verified {
                prefill: PrefillOutcome::NoHistory
            }
        );
        assert!(verified.notices.is_empty());
        assert!(verified.session.draft.state.is_empty());
        assert!(verified.session.draft.neighborhood.is_empty());
        assert!(verified.session.draft.location.is_empty());
    }

    #[tokio::test]
    async fn test_prefill_failure_is_a_notice() {
        let h = harness(&[("CHARLIE3", "8080")]);
        h.reports.set_fail_reads(true);

        let verified = run(&h.workflow, h.workflow.start_session(), login("CHARLIE3", "8080")).await;
        assert_eq!(
            verified.effect,
            Effect::Verified {
                prefill: PrefillOutcome::Unavailable
            }
        );
        assert_eq!(verified.session.phase, Phase::Verified);
        assert!(matches!(
            verified.notices.as_slice(),
            [Notice::PrefillUnavailable(_)]
        ));
    }

    // =========================================================================
    // SCENARIO 5: SEQUENTIAL SUBMISSIONS
    // =========================================================================

    #[tokio::test]
    async fn test_sequential_submissions_share_one_session() {
        let h = harness(&[("DELTA4", "4444")]);

        let mut events = login("DELTA4", "4444");
        events.extend(location("Texas", "Northside", "EM10dh"));
        events.push(WorkflowEvent::Submit);
        let first = run(&h.workflow, h.workflow.start_session(), events).await;
        assert!(first.is_ok());
        assert_eq!(first.session.handle(), Some("DELTA4"));
        assert_eq!(first.session.phase, Phase::Verified);

        let mut events = vec![WorkflowEvent::EnterPin(Pin::from("4444"))];
        events.extend(location("Texas", "Northside", "EM10di"));
        events.push(WorkflowEvent::Edit(DraftEdit::Conditions(Conditions::B)));
        events.push(WorkflowEvent::Submit);
        let second = run(&h.workflow, first.session, events).await;
        assert!(second.is_ok());
        assert_eq!(second.session.handle(), Some("DELTA4"));
        assert_eq!(second.session.phase, Phase::Verified);

        let history = h.workflow.reports().history_for("DELTA4").await.unwrap();
        assert_eq!(history.len(), 2);
        // same date-time group: the later insert sorts first
        assert_eq!(history[0].report.location, "EM10di");
        assert!(history[0].id > history[1].id);
        assert!(h.credentials.get("DELTA4").unwrap().last_used.is_some());
    }

    #[tokio::test]
    async fn test_prefill_copies_location_of_latest_report() {
        let h = harness(&[("ECHO5", "5555")]);

        let mut events = login("ECHO5", "5555");
        events.extend(location("Oklahoma", "Eastside", "EM15ab"));
        events.push(WorkflowEvent::Submit);
        assert!(run(&h.workflow, h.workflow.start_session(), events).await.is_ok());

        let verified = run(&h.workflow, h.workflow.start_session(), login("ECHO5", "5555")).await;
        assert!(matches!(verified.effect, Effect::Verified { prefill: PrefillOutcome::Filled { .. } }));
        assert_eq!(verified.session.draft.state, "Oklahoma");
        assert_eq!(verified.session.draft.neighborhood, "Eastside");
        assert_eq!(verified.session.draft.location, "EM15ab");
    }

    // =========================================================================
    // STORAGE FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_insert_failure_keeps_the_draft() {
        let h = harness(&[("FOX6", "6666")]);

        let mut events = login("FOX6", "6666");
        events.extend(location("Texas", "Northside", "EM10dh"));
        let ready = run(&h.workflow, h.workflow.start_session(), events).await;

        h.reports.set_fail_writes(true);
        let failed = h.workflow.dispatch(ready.session.clone(), WorkflowEvent::Submit).await;
        assert!(matches!(failed.error(), Some(WorkflowError::Storage(_))));
        assert_eq!(failed.session, ready.session);

        h.reports.set_fail_writes(false);
        let retried = h.workflow.dispatch(failed.session, WorkflowEvent::Submit).await;
        assert!(retried.is_ok());
        assert_eq!(h.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_last_used_failure_does_not_fail_submission() {
        let h = harness(&[("GOLF7", "7777")]);

        let mut events = login("GOLF7", "7777");
        events.extend(location("Texas", "Northside", "EM10dh"));
        let ready = run(&h.workflow, h.workflow.start_session(), events).await;

        h.credentials.set_fail_writes(true);
        let submitted = h.workflow.dispatch(ready.session, WorkflowEvent::Submit).await;
        assert!(matches!(submitted.effect, Effect::Submitted { .. }));
        assert_eq!(submitted.notices, vec![Notice::LastUsedNotUpdated]);
        assert_eq!(h.reports.len(), 1);
    }

    // =========================================================================
    // DIRECTORY
    // =========================================================================

    #[tokio::test]
    async fn test_directory_degrades_per_list() {
        let repo = Arc::new(StaticDirectory::new(
            ["ALPHA1", "BRAVO2"],
            ["Texas"],
            ["Northside", "Southside"],
        ));
        repo.set_fail_states(true);
        let directory = DirectoryService::new(Arc::clone(&repo));

        let snapshot = directory.load().await;
        assert_eq!(snapshot.handles, ["ALPHA1", "BRAVO2"]);
        assert!(snapshot.states.is_empty());
        assert_eq!(snapshot.neighborhoods.len(), 2);
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].list, DirectoryList::States);
        assert!(!snapshot.is_complete());
    }
}
