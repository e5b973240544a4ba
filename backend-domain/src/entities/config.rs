// Runtime configuration handed to the inner layers

use serde::{Deserialize, Serialize};

use crate::value_objects::FingerprintMode;

pub const DEFAULT_ZONES: [&str; 8] = [
    "easy", "medium", "hard", "extreme", "insane", "trial", "race", "therun",
];

/// Field names and zone set of the player dump format.
///
/// Older server builds keyed players by `guid` and tracked a `slide` zone,
/// newer ones key by `buid`; both are described by a schema value instead of
/// being hard-coded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub identity_field: String,
    pub session_key_field: String,
    pub zones: Vec<String>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            identity_field: "buid".to_string(),
            session_key_field: "guid".to_string(),
            zones: DEFAULT_ZONES.iter().map(|zone| zone.to_string()).collect(),
        }
    }
}

impl RecordSchema {
    pub fn player_prefix(&self) -> String {
        format!("{{'{}': '", self.identity_field)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub schema: RecordSchema,
    pub berry_snapshot_interval_hours: f64,
    pub poll_interval_seconds: u64,
    pub chat_fingerprint: FingerprintMode,
    pub top_runs_limit: usize,
    pub top_runs_excluded_guids: Vec<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4200".to_string(),
            api_token: None,
            schema: RecordSchema::default(),
            berry_snapshot_interval_hours: 4.0,
            poll_interval_seconds: 30,
            chat_fingerprint: FingerprintMode::SecondLine,
            top_runs_limit: 3,
            top_runs_excluded_guids: Vec::new(),
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
