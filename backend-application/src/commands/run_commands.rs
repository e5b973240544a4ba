use tracing::{debug, warn};

use backend_domain::{decide_run, CycleReport, PlayerRecord, RunDecision, RunRecord, ServerRunEvent};

use crate::AppState;

/// Applies the personal-best retention rules to every configured zone.
pub async fn record_player_runs(
    state: &AppState,
    player: &PlayerRecord,
    now: i64,
    report: &mut CycleReport,
) {
    for zone in &state.config.schema.zones {
        let observed = player.best_time(zone);
        let existing = match state.run_repo.query_best_run(&player.identity, zone).await {
            Ok(existing) => existing,
            Err(err) => {
                warn!(player = %player.identity, zone = %zone, "failed to query best run: {}", err);
                report.persistence_errors += 1;
                continue;
            }
        };

        let decision = decide_run(existing, observed);
        if !decision.writes() {
            continue;
        }

        if decision == RunDecision::ReplacePlaceholder {
            if let Err(err) = state.run_repo.delete_zero_run(&player.identity, zone).await {
                warn!(player = %player.identity, zone = %zone, "failed to delete placeholder run: {}", err);
                report.persistence_errors += 1;
                continue;
            }
            report.placeholders_replaced += 1;
        }

        let run = RunRecord {
            identity: player.identity.clone(),
            zone: zone.clone(),
            time: observed,
            occurred: now,
        };
        match state.run_repo.insert_run(&run).await {
            Ok(()) => {
                debug!(player = %player.identity, zone = %zone, time = observed, ?decision, "run recorded");
                report.runs_inserted += 1;
            }
            Err(err) => {
                warn!(player = %player.identity, zone = %zone, "failed to insert run: {}", err);
                report.persistence_errors += 1;
            }
        }
    }
}

pub async fn record_server_runs(state: &AppState, events: &[ServerRunEvent], report: &mut CycleReport) {
    report.server_runs_seen += events.len();
    for event in events {
        match state.run_repo.insert_server_run_if_absent(event).await {
            Ok(true) => report.server_runs_inserted += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(uniq_id = %event.uniq_id, "failed to insert server run: {}", err);
                report.persistence_errors += 1;
            }
        }
    }
}
