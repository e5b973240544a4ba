use tracing::{debug, warn};

use backend_domain::ports::GeoLookup;
use backend_domain::{ActiveRosterEntry, Alias, CycleReport, PlayerRecord, SessionIdentityIndex};

use crate::commands::{run_commands, snapshot_commands};
use crate::AppState;

/// Attaches address, location and visit time. Returns `false` when the
/// player has no known address and must be skipped this cycle.
pub fn enrich_player(
    player: &mut PlayerRecord,
    index: &SessionIdentityIndex,
    geo: &dyn GeoLookup,
    now: i64,
) -> bool {
    let Some(address) = index.address_of(player.correlation_key()) else {
        return false;
    };
    let location = geo.lookup(address);
    if location.is_none() {
        debug!(player = %player.identity, ip = %address, "no geolocation for address");
    }
    player.ip = Some(address.to_string());
    player.location = location;
    player.visited = now;
    true
}

pub async fn persist_players(
    state: &AppState,
    players: &[PlayerRecord],
    index: &SessionIdentityIndex,
    now: i64,
    report: &mut CycleReport,
) {
    for player in players {
        let mut player = player.clone();
        if !enrich_player(&mut player, index, state.geo.as_ref(), now) {
            warn!(player = %player.identity, name = %player.name, "no address for player, skipping");
            report.players_skipped += 1;
            continue;
        }
        persist_player(state, &player, now, report).await;
    }
}

async fn persist_player(state: &AppState, player: &PlayerRecord, now: i64, report: &mut CycleReport) {
    match state.player_repo.upsert_player(player).await {
        Ok(()) => report.players_persisted += 1,
        Err(err) => {
            warn!(player = %player.identity, "failed to upsert player: {}", err);
            report.persistence_errors += 1;
        }
    }

    run_commands::record_player_runs(state, player, now, report).await;

    if let Err(err) = state
        .player_repo
        .upsert_active_roster_entry(&ActiveRosterEntry::from(player))
        .await
    {
        warn!(player = %player.identity, "failed to upsert active roster entry: {}", err);
        report.persistence_errors += 1;
    }

    if let Err(err) = state.player_repo.upsert_alias(&Alias::from(player)).await {
        warn!(player = %player.identity, "failed to upsert alias: {}", err);
        report.persistence_errors += 1;
    }

    snapshot_commands::snapshot_berries_if_due(state, player, now, report).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::GeoInfo;

    struct FixedGeo;

    impl GeoLookup for FixedGeo {
        fn lookup(&self, ip: &str) -> Option<GeoInfo> {
            (ip == "81.2.69.160").then(|| GeoInfo {
                country: "United Kingdom".to_string(),
                country_code: "GB".to_string(),
                city: "London".to_string(),
                latitude: 51.5,
                longitude: -0.12,
            })
        }
    }

    fn player(identity: &str, session_key: &str) -> PlayerRecord {
        PlayerRecord {
            identity: identity.to_string(),
            session_key: Some(session_key.to_string()),
            ..PlayerRecord::default()
        }
    }

    #[test]
    fn enriches_player_with_known_address() {
        let index = SessionIdentityIndex::build([
            "1:00 Bob 81.2.69.160:28960 ^5entered this server g1",
            "1:01 Eve 10.0.0.7:28960 ^5entered this server g2",
        ]);

        let mut bob = player("b1", "g1");
        assert!(enrich_player(&mut bob, &index, &FixedGeo, 77));
        assert_eq!(bob.ip.as_deref(), Some("81.2.69.160"));
        assert_eq!(bob.location.as_ref().map(|geo| geo.country_code.as_str()), Some("GB"));
        assert_eq!(bob.visited, 77);

        let mut eve = player("b2", "g2");
        assert!(enrich_player(&mut eve, &index, &FixedGeo, 77));
        assert!(eve.location.is_none());
    }

    #[test]
    fn skips_player_without_address() {
        let index = SessionIdentityIndex::default();
        let mut ghost = player("b3", "g3");
        assert!(!enrich_player(&mut ghost, &index, &FixedGeo, 1));
        assert!(ghost.ip.is_none());
    }
}
