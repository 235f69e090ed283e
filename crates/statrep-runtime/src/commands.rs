//! Command execution.
//!
//! Each command returns the text to print so it can be exercised without a
//! terminal.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use shared_types::{DatetimeGroup, Pin};
use sr_01_credentials::{CredentialStoreApi, VerificationOutcome};
use sr_02_reports::{Checklist, ChecklistField, Conditions, ReportStoreApi, StatusReport};
use sr_03_submission::{DraftEdit, Effect, Notice, PrefillOutcome, Transition, WorkflowEvent};
use sr_04_directory::{suggest, DirectoryList, DirectoryLookupApi, DEFAULT_SUGGESTION_LIMIT};

use crate::adapters::{prime_workflow_series, publish_stored_totals};
use crate::cli::{Commands, DirectoryCommands, ListKind, SubmitArgs};
use crate::container::StatrepContainer;

/// Run one command against the container.
pub async fn execute(container: &StatrepContainer, command: Commands, json: bool) -> Result<String> {
    match command {
        Commands::Enroll { handle, pin } => {
            container
                .credentials()
                .enroll(&handle, &Pin::new(pin))
                .await
                .with_context(|| format!("could not enroll {handle}"))?;
            Ok(format!("Enrolled {}\n", handle.trim()))
        }
        Commands::Handles => {
            let list = container.credentials().list_handles().await;
            if let Some(err) = list.error {
                bail!("could not load handles: {err}");
            }
            Ok(lines(&list.handles))
        }
        Commands::Verify { handle, pin } => {
            let pin = Pin::new(pin);
            let outcome = container.credentials().verify_detailed(&handle, &pin).await;
            match outcome {
                VerificationOutcome::Verified if container.credentials().is_temporary(&pin) => {
                    Ok(format!("{handle}: verified (temporary PIN, rotation required)\n"))
                }
                VerificationOutcome::Verified => Ok(format!("{handle}: verified\n")),
                VerificationOutcome::LookupError => {
                    bail!("{handle}: credential store unavailable")
                }
                _ => bail!("{handle}: invalid handle or PIN"),
            }
        }
        Commands::ChangePin {
            handle,
            current,
            new_pin,
            confirm,
        } => change_pin(container, handle, current, new_pin, confirm).await,
        Commands::Submit(args) => submit(container, args).await,
        Commands::Last { handle } => {
            let last = container.reports().last_for(&handle).await?;
            match last {
                Some(report) => render_reports(&[report], json),
                None if json => Ok("null\n".to_string()),
                None => Ok(format!("No reports from {handle}\n")),
            }
        }
        Commands::Recent {
            limit,
            state,
            neighborhood,
        } => {
            let limit = limit.unwrap_or(container.config.reports.recent_limit);
            let reports = match (state, neighborhood) {
                (Some(state), Some(neighborhood)) => {
                    container
                        .reports()
                        .recent_by_location(&state, &neighborhood, limit)
                        .await?
                }
                _ => container.reports().recent(limit).await?,
            };
            render_reports(&reports, json)
        }
        Commands::History { handle } => {
            let reports = container.reports().history_for(&handle).await?;
            render_reports(&reports, json)
        }
        Commands::Directory { command } => directory(container, command).await,
        Commands::Metrics => metrics(container),
    }
}

async fn change_pin(
    container: &StatrepContainer,
    handle: String,
    current: String,
    new_pin: String,
    confirm: Option<String>,
) -> Result<String> {
    let workflow = &container.workflow;
    let confirm_pin = Pin::new(confirm.unwrap_or_else(|| new_pin.clone()));

    let session = workflow.start_session();
    let session = expect_ok(
        workflow
            .dispatch(session, WorkflowEvent::SelectHandle(handle.clone()))
            .await,
    )?
    .session;
    let transition = expect_ok(
        workflow
            .dispatch(
                session,
                WorkflowEvent::ChangePin {
                    current_pin: Pin::new(current),
                    new_pin: Pin::new(new_pin),
                    confirm_pin,
                },
            )
            .await,
    )?;

    let mut out = format!("PIN changed for {}\n", handle.trim());
    write_notices(&mut out, &transition.notices)?;
    Ok(out)
}

async fn submit(container: &StatrepContainer, args: SubmitArgs) -> Result<String> {
    let workflow = &container.workflow;
    let conditions: Conditions = args.conditions.parse()?;
    let mut out = String::new();

    let mut session = workflow.start_session();
    for event in [
        WorkflowEvent::SelectHandle(args.handle.clone()),
        WorkflowEvent::EnterPin(Pin::new(args.pin.clone())),
    ] {
        session = expect_ok(workflow.dispatch(session, event).await)?.session;
    }

    let verified = expect_ok(workflow.dispatch(session, WorkflowEvent::Verify).await)?;
    write_notices(&mut out, &verified.notices)?;
    let mut transition = verified;
    if transition.effect == Effect::RotationRequired {
        let Some(new_pin) = args.new_pin.clone() else {
            bail!("{} is using a temporary PIN; rerun with --new-pin", args.handle.trim());
        };
        transition = expect_ok(
            workflow
                .dispatch(
                    transition.session,
                    WorkflowEvent::Rotate {
                        new_pin: Pin::new(new_pin.clone()),
                        confirm_pin: Pin::new(new_pin),
                    },
                )
                .await,
        )?;
        out.push_str("Temporary PIN replaced\n");
        write_notices(&mut out, &transition.notices)?;
    }
    if let Effect::Verified { prefill } | Effect::PinRotated { prefill } = &transition.effect {
        if let PrefillOutcome::Filled { from } = prefill {
            writeln!(out, "Location copied from report of {from}")?;
        }
    }

    let mut session = transition.session;
    for edit in draft_edits(&args, conditions) {
        session = expect_ok(workflow.dispatch(session, WorkflowEvent::Edit(edit)).await)?.session;
    }

    let submitted = expect_ok(workflow.dispatch(session, WorkflowEvent::Submit).await)?;
    if let Effect::Submitted { id, report } = &submitted.effect {
        writeln!(
            out,
            "Report #{id} stored for {} at {} ({})",
            report.handle,
            report.datetime_group,
            report.conditions.description()
        )?;
    }
    write_notices(&mut out, &submitted.notices)?;
    Ok(out)
}

fn draft_edits(args: &SubmitArgs, conditions: Conditions) -> Vec<DraftEdit> {
    let mut edits = Vec::new();
    if let Some(dtg) = &args.datetime_group {
        edits.push(DraftEdit::DatetimeGroup(DatetimeGroup::new(dtg.as_str())));
    }
    if let Some(state) = &args.state {
        edits.push(DraftEdit::State(state.clone()));
    }
    if let Some(neighborhood) = &args.neighborhood {
        edits.push(DraftEdit::Neighborhood(neighborhood.clone()));
    }
    if let Some(location) = &args.location {
        edits.push(DraftEdit::Location(location.clone()));
    }
    edits.push(DraftEdit::Conditions(conditions));
    edits.push(DraftEdit::Checklist(Checklist {
        position: args.position.clone(),
        commercial_power: args.commercial_power.clone(),
        water: args.water.clone(),
        sanitation: args.sanitation.clone(),
        grid_comms: args.grid_comms.clone(),
        transportation: args.transportation.clone(),
        comments: args.comments.clone(),
    }));
    edits
}

async fn directory(container: &StatrepContainer, command: DirectoryCommands) -> Result<String> {
    let directory = &container.directory;
    match command {
        DirectoryCommands::List { list: Some(kind) } => {
            let entries = match kind {
                ListKind::Handles => directory.list_handles().await?,
                ListKind::States => directory.list_states().await?,
                ListKind::Neighborhoods => directory.list_neighborhoods().await?,
            };
            Ok(lines(&entries))
        }
        DirectoryCommands::List { list: None } => {
            let snapshot = directory.load().await;
            let mut out = String::new();
            for list in [
                DirectoryList::Handles,
                DirectoryList::States,
                DirectoryList::Neighborhoods,
            ] {
                writeln!(out, "{list}:")?;
                for entry in snapshot.entries(list) {
                    writeln!(out, "  {entry}")?;
                }
            }
            for warning in &snapshot.warnings {
                writeln!(out, "warning: {warning}")?;
            }
            Ok(out)
        }
        DirectoryCommands::Suggest { list, query, limit } => {
            let entries = match list {
                ListKind::Handles => directory.list_handles().await?,
                ListKind::States => directory.list_states().await?,
                ListKind::Neighborhoods => directory.list_neighborhoods().await?,
            };
            let limit = limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
            Ok(lines(&suggest(&entries, &query, limit)))
        }
        DirectoryCommands::AddState { name } => {
            directory.add_state(&name).await?;
            Ok(format!("Added state {}\n", name.trim()))
        }
        DirectoryCommands::AddNeighborhood { name } => {
            directory.add_neighborhood(&name).await?;
            Ok(format!("Added neighborhood {}\n", name.trim()))
        }
    }
}

/// Counters cover this process only; the gauges are read from the database.
fn metrics(container: &StatrepContainer) -> Result<String> {
    sr_telemetry::register_metrics()?;
    prime_workflow_series();
    let totals = container
        .store
        .stored_totals()
        .context("could not count stored rows")?;
    publish_stored_totals(&totals);
    Ok(sr_telemetry::gather_metrics()?)
}

fn expect_ok(transition: Transition) -> Result<Transition> {
    match transition.effect {
        Effect::Rejected(err) => Err(err.into()),
        _ => Ok(transition),
    }
}

fn write_notices(out: &mut String, notices: &[Notice]) -> std::fmt::Result {
    for notice in notices {
        match notice {
            Notice::PrefillUnavailable(message) => {
                writeln!(out, "note: could not load last report: {message}")?
            }
            Notice::LastUsedNotUpdated => writeln!(out, "note: last-used time was not updated")?,
        }
    }
    Ok(())
}

fn lines(entries: &[String]) -> String {
    entries.iter().map(|e| format!("{e}\n")).collect()
}

fn render_reports(reports: &[StatusReport], json: bool) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(reports).context("encoding reports")?;
        text.push('\n');
        return Ok(text);
    }
    if reports.is_empty() {
        return Ok("No reports\n".to_string());
    }

    let mut out = String::new();
    for report in reports {
        let body = &report.report;
        writeln!(
            out,
            "#{} {} {} {}/{} {} [{}] {}",
            report.id,
            body.datetime_group,
            body.handle,
            body.state,
            body.neighborhood,
            body.location,
            body.conditions,
            body.conditions.description()
        )?;
        if let Some(checklist) = &body.checklist {
            for field in ChecklistField::ALL {
                if let Some(code) = checklist.get(field) {
                    let label = field.label(code).unwrap_or(code);
                    writeln!(out, "    {}: {label}", field.name())?;
                }
            }
            if let Some(comments) = &checklist.comments {
                writeln!(out, "    comments: {comments}")?;
            }
        }
    }
    Ok(out)
}
