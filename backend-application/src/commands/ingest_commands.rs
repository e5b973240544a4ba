use anyhow::Context;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use backend_domain::{
    current_millis, roster_identities, CaptureOutput, CaptureStateMachine, ChatExtractor, CycleReport, LogStream,
    RecordKind, SessionIdentityIndex,
};

use crate::commands::{chat_commands, player_commands, roster_commands, run_commands};
use crate::{AppError, AppState};

pub async fn run_ingest_cycle(state: &AppState) -> Result<CycleReport, AppError> {
    run_ingest_cycle_at(state, current_millis()).await
}

/// One full pass over the three streams. Rejected with
/// `CycleInProgress` while another cycle holds the guard.
pub async fn run_ingest_cycle_at(state: &AppState, now: i64) -> Result<CycleReport, AppError> {
    let Some(_permit) = state.cycle_guard.try_acquire() else {
        state.metrics.record_cycle_skipped();
        return Err(AppError::CycleInProgress);
    };

    let cycle_id = Uuid::new_v4().to_string();
    state.ingest_status.write().await.running = true;

    let span = info_span!("ingest_cycle", cycle_id = %cycle_id);
    let result = execute_cycle(state, cycle_id, now).instrument(span).await;

    let mut status = state.ingest_status.write().await;
    status.running = false;
    status.updated_at = current_millis();
    match &result {
        Ok(report) => {
            state.metrics.record_cycle(report);
            status.cycles_completed += 1;
            status.last_report = Some(report.clone());
            status.last_error = None;
        }
        Err(err) => {
            state.metrics.record_cycle_error();
            status.last_error = Some(err.to_string());
        }
    }
    result
}

async fn execute_cycle(state: &AppState, cycle_id: String, now: i64) -> Result<CycleReport, AppError> {
    let mut report = CycleReport {
        cycle_id,
        started_at: now,
        ..CycleReport::default()
    };

    if let Some(transport) = &state.log_transport {
        transport.refresh().await.map_err(|err| {
            error!("failed to refresh log streams: {:#}", err);
            AppError::Internal(err)
        })?;
    }

    let enterleave = read_stream(state, LogStream::Enterleave).await?;
    let server_state = read_stream(state, LogStream::ServerState).await?;
    let gameplay = read_stream(state, LogStream::GameplayEvents).await?;

    let index = SessionIdentityIndex::build(&enterleave);
    report.sessions_indexed = index.len();

    let schema = &state.config.schema;
    let previous_roster = state.roster.read().await.clone();
    let captured = CaptureStateMachine::new(schema, now, previous_roster).scan(&server_state);
    log_failures(&captured, LogStream::ServerState);
    report.players_parsed = captured.players.len();
    report.player_parse_failures += captured.failures_of(RecordKind::Player);
    report.run_parse_failures += captured.failures_of(RecordKind::Run);

    run_commands::record_server_runs(state, &captured.runs, &mut report).await;
    player_commands::persist_players(state, &captured.players, &index, now, &mut report).await;
    roster_commands::reconcile_roster(state, &captured.players, &mut report).await;

    let roster_identities = roster_identities(&captured.players);
    let mut runs = CaptureStateMachine::runs_only(schema, now);
    let mut chat = ChatExtractor::new(
        now,
        state.config.chat_fingerprint,
        &roster_identities,
        &captured.session_identities,
    );
    for line in &gameplay {
        runs.feed_line(line);
        chat.feed_line(line);
    }
    let gameplay_runs = runs.finish();
    let chat = chat.finish();
    log_failures(&gameplay_runs, LogStream::GameplayEvents);
    report.run_parse_failures += gameplay_runs.failures_of(RecordKind::Run);
    if chat.rejected > 0 {
        warn!(rejected = chat.rejected, "chat lines without enough fields");
    }

    run_commands::record_server_runs(state, &gameplay_runs.runs, &mut report).await;
    chat_commands::persist_chat(state, &chat.messages, &mut report).await;

    *state.roster.write().await = captured.players;

    report.finished_at = current_millis();
    info!(
        players = report.players_persisted,
        skipped = report.players_skipped,
        runs = report.runs_inserted,
        server_runs = report.server_runs_inserted,
        chat = report.chat_inserted,
        snapshots = report.snapshots_taken,
        errors = report.persistence_errors,
        "ingest cycle finished"
    );
    Ok(report)
}

async fn read_stream(state: &AppState, stream: LogStream) -> Result<Vec<String>, AppError> {
    let lines = state
        .log_source
        .read_lines(stream)
        .await
        .with_context(|| format!("stream {stream} unavailable"))
        .map_err(|err| {
            error!("aborting cycle: {:#}", err);
            AppError::Internal(err)
        })?;
    info!(stream = %stream, lines = lines.len(), "stream read");
    Ok(lines)
}

fn log_failures(output: &CaptureOutput, stream: LogStream) {
    for failure in &output.failures {
        warn!(
            stream = %stream,
            kind = ?failure.kind,
            line = failure.line_number,
            "malformed record: {}",
            failure.reason
        );
    }
}
