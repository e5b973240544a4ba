use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{format_run_time, Leaderboard, LeaderboardEntry, TopRunRow};

pub async fn get_leaderboard(state: &AppState) -> Result<Leaderboard, AppError> {
    let config = &state.config;
    let mut leaderboard = Leaderboard {
        zones: config.schema.zones.clone(),
        ..Leaderboard::default()
    };

    for zone in &config.schema.zones {
        let rows = state
            .player_repo
            .top_runs(zone, &config.top_runs_excluded_guids, config.top_runs_limit)
            .await
            .map_err(|err| {
                error!(zone = %zone, "failed to fetch top runs: {}", err);
                AppError::Internal(err)
            })?;
        leaderboard.top_runs.insert(zone.clone(), rank_rows(rows));
    }
    Ok(leaderboard)
}

fn rank_rows(rows: Vec<TopRunRow>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| LeaderboardEntry {
            rank: idx + 1,
            display_time: format_run_time(row.best_time),
            identity: row.identity,
            name: row.name,
            time: row.best_time,
            country_code: row.country_code,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_rows_in_order() {
        let row = |identity: &str, best_time: i64| TopRunRow {
            identity: identity.to_string(),
            session_key: format!("g-{identity}"),
            name: identity.to_uppercase(),
            zone: "easy".to_string(),
            best_time,
            country_code: "GB".to_string(),
        };
        let ranked = rank_rows(vec![row("a", 14_238), row("b", 83_456)]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].display_time, "14.23");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].display_time, "1:23.45");
        assert_eq!(ranked[1].name, "B");
    }
}
