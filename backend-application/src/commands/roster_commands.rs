use tracing::warn;

use backend_domain::{roster_identities, CycleReport, PlayerRecord};

use crate::AppState;

/// Drops roster rows for identities that were not in this cycle's dump.
pub async fn reconcile_roster(state: &AppState, players: &[PlayerRecord], report: &mut CycleReport) {
    let keep = roster_identities(players);
    if let Err(err) = state
        .player_repo
        .delete_active_roster_entries_not_in(&keep)
        .await
    {
        warn!(online = keep.len(), "failed to clean active roster: {}", err);
        report.persistence_errors += 1;
    }
}
