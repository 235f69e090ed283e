//! # SQLite Flows
//!
//! The operator scenarios replayed through `StatrepContainer` on a
//! temporary database file, plus persistence across reopen and concurrent
//! writers.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use shared_types::{DatetimeGroup, FixedTimeSource, Pin};
    use sr_01_credentials::{CredentialRepository, CredentialStoreApi};
    use sr_02_reports::{Conditions, NewStatusReport, ReportStoreApi};
    use sr_03_submission::{
        DraftEdit, Effect, NoOpMetrics, Phase, SessionState, Transition, WorkflowError,
        WorkflowEvent,
    };
    use sr_04_directory::DirectoryLookupApi;
    use statrep_runtime::{RuntimeConfig, SqliteStore, StatrepContainer};
    use tempfile::TempDir;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn open(dir: &TempDir) -> StatrepContainer {
        let store = SqliteStore::open(dir.path().join("statrep.db")).unwrap();
        StatrepContainer::build(
            RuntimeConfig::default(),
            Arc::new(store),
            Arc::new(FixedTimeSource(
                Utc.with_ymd_and_hms(2025, 1, 15, 18, 5, 0).unwrap(),
            )),
            Arc::new(NoOpMetrics),
        )
    }

    async fn run(
        container: &StatrepContainer,
        mut session: SessionState,
        events: Vec<WorkflowEvent>,
    ) -> Transition {
        let mut last = None;
        for event in events {
            let transition = container.workflow.dispatch(session, event).await;
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

    fn report_for(handle: &str, minute: u32) -> NewStatusReport {
        NewStatusReport::new(
            handle,
            DatetimeGroup::new(format!("2025-01-15 10:{minute:02}")),
            "Texas",
            "Northside",
            "EM10dh",
            Conditions::B,
            None,
        )
    }

    // =========================================================================
    // SCENARIOS OVER SQLITE
    // =========================================================================

    #[tokio::test]
    async fn test_forced_rotation_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let container = open(&dir);
            container
                .credentials()
                .enroll("ALPHA1", &Pin::from("z9931"))
                .await
                .unwrap();

            let verified = run(&container, container.workflow.start_session(), login("ALPHA1", "z9931")).await;
            assert_eq!(verified.effect, Effect::RotationRequired);

            let rotated = container
                .workflow
                .dispatch(
                    verified.session,
                    WorkflowEvent::Rotate {
                        new_pin: Pin::from("7412"),
                        confirm_pin: Pin::from("7412"),
                    },
                )
                .await;
            assert!(rotated.is_ok());
        }

        let container = open(&dir);
        let credentials = container.credentials();
        assert!(credentials.verify("ALPHA1", &Pin::from("7412")).await);
        assert!(!credentials.verify("ALPHA1", &Pin::from("z9931")).await);
    }

    #[tokio::test]
    async fn test_submission_round_trip_and_last_used() {
        let dir = tempfile::tempdir().unwrap();
        let container = open(&dir);
        container
            .credentials()
            .enroll("BRAVO2", &Pin::from("5521"))
            .await
            .unwrap();

        let mut events = login("BRAVO2", "5521");
        events.extend([
            WorkflowEvent::Edit(DraftEdit::State("Texas".into())),
            WorkflowEvent::Edit(DraftEdit::Neighborhood("Northside".into())),
            WorkflowEvent::Edit(DraftEdit::Location("EM10dh".into())),
            WorkflowEvent::Submit,
        ]);
        let submitted = run(&container, container.workflow.start_session(), events).await;
        let Effect::Submitted { id, .. } = submitted.effect else {
            panic!("expected submission");
        };
        assert!(submitted.notices.is_empty());

        let last = container.reports().last_for("BRAVO2").await.unwrap().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.report.conditions, Conditions::A);
        assert!(last.report.checklist.is_none());
        assert_eq!(last.report.datetime_group.as_str(), "2025-01-15 12:05");

        let credential = container
            .store
            .find_credential("BRAVO2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            credential.last_used,
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 18, 5, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let container = open(&dir);
        container
            .credentials()
            .enroll("CHARLIE3", &Pin::from("8080"))
            .await
            .unwrap();

        let mut events = login("CHARLIE3", "8080");
        events.extend([
            WorkflowEvent::Edit(DraftEdit::State("Texas".into())),
            WorkflowEvent::Edit(DraftEdit::Location("EM10dh".into())),
            WorkflowEvent::Submit,
        ]);
        let rejected = run(&container, container.workflow.start_session(), events).await;
        assert_eq!(
            rejected.error(),
            Some(&WorkflowError::Validation {
                field: "neighborhood"
            })
        );
        assert!(container.reports().recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sequential_submissions_over_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let container = open(&dir);
        container
            .credentials()
            .enroll("DELTA4", &Pin::from("4444"))
            .await
            .unwrap();

        let mut session = container.workflow.start_session();
        for grid in ["EM10dh", "EM10di"] {
            let mut events = vec![
                WorkflowEvent::SelectHandle("DELTA4".into()),
                WorkflowEvent::EnterPin(Pin::from("4444")),
            ];
            if session.phase != Phase::Verified {
                events.push(WorkflowEvent::Verify);
            }
            events.extend([
                WorkflowEvent::Edit(DraftEdit::State("Texas".into())),
                WorkflowEvent::Edit(DraftEdit::Neighborhood("Northside".into())),
                WorkflowEvent::Edit(DraftEdit::Location(grid.into())),
                WorkflowEvent::Submit,
            ]);
            let submitted = run(&container, session, events).await;
            assert!(submitted.is_ok(), "{:?}", submitted.effect);
            assert_eq!(submitted.session.handle(), Some("DELTA4"));
            assert_eq!(submitted.session.phase, Phase::Verified);
            session = submitted.session;
        }

        let by_location = container
            .reports()
            .recent_by_location("Texas", "Northside", 10)
            .await
            .unwrap();
        assert_eq!(by_location.len(), 2);
        assert_eq!(by_location[0].report.location, "EM10di");
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let container = Arc::new(open(&dir));

        let mut tasks = Vec::new();
        for minute in 0..16u32 {
            let container = Arc::clone(&container);
            tasks.push(tokio::spawn(async move {
                container
                    .reports()
                    .insert(report_for("ECHO5", minute))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);

        let history = container.reports().history_for("ECHO5").await.unwrap();
        assert_eq!(history.len(), 16);
        assert_eq!(history[0].report.datetime_group.as_str(), "2025-01-15 10:15");
    }

    // =========================================================================
    // DIRECTORY
    // =========================================================================

    #[tokio::test]
    async fn test_directory_over_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let container = open(&dir);
        container
            .credentials()
            .enroll("FOX6", &Pin::from("z0001"))
            .await
            .unwrap();
        container.directory.add_state("  Texas ").await.unwrap();
        container.directory.add_neighborhood("Northside").await.unwrap();

        let snapshot = container.directory.load().await;
        assert_eq!(snapshot.handles, ["FOX6"]);
        assert_eq!(snapshot.states, ["Texas"]);
        assert_eq!(snapshot.neighborhoods, ["Northside"]);
        assert!(snapshot.is_complete());

        assert!(container.directory.add_state("Texas").await.is_err());
    }
}
