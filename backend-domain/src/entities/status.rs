// Ingestion cycle status

use serde::{Deserialize, Serialize};

/// Per-cycle result aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_id: String,
    pub started_at: i64,
    pub finished_at: i64,
    pub sessions_indexed: usize,
    pub players_parsed: usize,
    pub players_persisted: usize,
    pub players_skipped: usize,
    pub player_parse_failures: usize,
    pub run_parse_failures: usize,
    pub runs_inserted: usize,
    pub placeholders_replaced: usize,
    pub server_runs_seen: usize,
    pub server_runs_inserted: usize,
    pub chat_seen: usize,
    pub chat_inserted: usize,
    pub snapshots_taken: usize,
    pub persistence_errors: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStatus {
    pub running: bool,
    pub cycles_completed: u64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_report: Option<CycleReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
