// Leaderboard projections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopRunRow {
    pub identity: String,
    pub session_key: String,
    pub name: String,
    pub zone: String,
    pub best_time: i64,
    pub country_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub identity: String,
    pub name: String,
    pub time: i64,
    pub display_time: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub zones: Vec<String>,
    pub top_runs: BTreeMap<String, Vec<LeaderboardEntry>>,
}
