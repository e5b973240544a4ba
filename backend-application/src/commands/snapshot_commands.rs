use tracing::{info, warn};

use backend_domain::{snapshot_due, BerrySnapshot, CycleReport, PlayerRecord};

use crate::AppState;

pub async fn snapshot_berries_if_due(
    state: &AppState,
    player: &PlayerRecord,
    now: i64,
    report: &mut CycleReport,
) {
    let latest = match state.snapshot_repo.latest_berry_snapshot(&player.identity).await {
        Ok(latest) => latest,
        Err(err) => {
            warn!(player = %player.identity, "failed to query berry snapshots: {}", err);
            report.persistence_errors += 1;
            return;
        }
    };

    let interval = state.config.berry_snapshot_interval_hours;
    if !snapshot_due(latest.map(|snapshot| snapshot.occurred), now, interval) {
        return;
    }

    let snapshot = BerrySnapshot {
        identity: player.identity.clone(),
        name: player.name.clone(),
        berries: player.stats.berries,
        occurred: now,
    };
    match state.snapshot_repo.insert_berry_snapshot(&snapshot).await {
        Ok(()) => {
            info!(player = %player.identity, berries = snapshot.berries, "berry snapshot taken");
            report.snapshots_taken += 1;
        }
        Err(err) => {
            warn!(player = %player.identity, "failed to insert berry snapshot: {}", err);
            report.persistence_errors += 1;
        }
    }
}
