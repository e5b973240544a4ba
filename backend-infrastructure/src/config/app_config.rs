use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, FingerprintMode, LogStream, RecordSchema, RuntimeConfig, DEFAULT_ZONES};

use crate::config::validation::{validate_field_name, validate_zone_name};

const DEFAULT_EXCLUDED_GUIDS: [&str; 2] = [
    "8ee4d654e01fa03ef2c0362f38ba8778",
    "000000001cc2de5d75200aa3b9008471",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Clickhouse,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLocation {
    pub stream: LogStream,
    pub path: PathBuf,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub storage: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub enterleave_path: String,
    pub server_state_path: String,
    pub gameplay_events_path: String,
    pub enterleave_url: Option<String>,
    pub server_state_url: Option<String>,
    pub gameplay_events_url: Option<String>,
    pub geo_table_path: Option<String>,
    pub identity_field: String,
    pub session_key_field: String,
    pub zones: Vec<String>,
    pub berry_snapshot_interval_hours: f64,
    pub poll_interval_seconds: u64,
    pub chat_fingerprint: String,
    pub top_runs_limit: usize,
    pub top_runs_excluded_guids: Vec<String>,
    pub log_dir: Option<String>,
    pub log_format: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub download_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4200".to_string(),
            api_token: None,
            storage: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "berry_trials".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            enterleave_path: "./logs/enterleave.log".to_string(),
            server_state_path: "./logs/server_log.txt".to_string(),
            gameplay_events_path: "./logs/games_mp.log".to_string(),
            enterleave_url: None,
            server_state_url: None,
            gameplay_events_url: None,
            geo_table_path: None,
            identity_field: "buid".to_string(),
            session_key_field: "guid".to_string(),
            zones: DEFAULT_ZONES.iter().map(|zone| zone.to_string()).collect(),
            berry_snapshot_interval_hours: 4.0,
            poll_interval_seconds: 30,
            chat_fingerprint: FingerprintMode::SecondLine.as_str().to_string(),
            top_runs_limit: 3,
            top_runs_excluded_guids: DEFAULT_EXCLUDED_GUIDS
                .iter()
                .map(|guid| guid.to_string())
                .collect(),
            log_dir: None,
            log_format: "text".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
            download_timeout_seconds: 60,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("TRIALS_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(Path::new(&path)).await
    }

    pub async fn load_from(file_path: &Path) -> Result<Self> {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", file_path.display(), err))?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_optional(self.api_token.take());
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.enterleave_url = normalize_optional(self.enterleave_url.take());
        self.server_state_url = normalize_optional(self.server_state_url.take());
        self.gameplay_events_url = normalize_optional(self.gameplay_events_url.take());
        self.geo_table_path = normalize_optional(self.geo_table_path.take());
        self.log_dir = normalize_optional(self.log_dir.take());
        self.storage = self.storage.trim().to_lowercase();
        self.log_format = self.log_format.trim().to_lowercase();
        self.identity_field = self.identity_field.trim().to_string();
        self.session_key_field = self.session_key_field.trim().to_string();
        self.zones = normalize_zone_list(std::mem::take(&mut self.zones));
        self.top_runs_excluded_guids =
            normalize_id_list(std::mem::take(&mut self.top_runs_excluded_guids));
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.enterleave_path = resolve_path(base, &self.enterleave_path);
        self.server_state_path = resolve_path(base, &self.server_state_path);
        self.gameplay_events_path = resolve_path(base, &self.gameplay_events_path);
        if let Some(path) = &self.geo_table_path {
            self.geo_table_path = Some(resolve_path(base, path));
        }
        if let Some(path) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        self.storage_kind()?;
        if self.zones.is_empty() {
            return Err(anyhow!("zones must not be empty"));
        }
        for zone in &self.zones {
            validate_zone_name(zone)?;
        }
        validate_field_name("identity_field", &self.identity_field)?;
        validate_field_name("session_key_field", &self.session_key_field)?;
        let interval = self.berry_snapshot_interval_hours;
        if interval.is_nan() || interval <= 0.0 {
            return Err(anyhow!("berry_snapshot_interval_hours must be greater than 0"));
        }
        if self.poll_interval_seconds == 0 {
            return Err(anyhow!("poll_interval_seconds must be greater than 0"));
        }
        if FingerprintMode::parse(&self.chat_fingerprint).is_none() {
            return Err(anyhow!(
                "chat_fingerprint must be second_line or preceding_line, got {}",
                self.chat_fingerprint
            ));
        }
        if self.top_runs_limit == 0 {
            return Err(anyhow!("top_runs_limit must be greater than 0"));
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("log_format must be text or json"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        Ok(())
    }

    pub fn storage_kind(&self) -> Result<StorageKind> {
        match self.storage.as_str() {
            "clickhouse" => Ok(StorageKind::Clickhouse),
            "memory" => Ok(StorageKind::Memory),
            other => Err(anyhow!("unknown storage backend: {}", other)),
        }
    }

    pub fn stream_locations(&self) -> Vec<StreamLocation> {
        LogStream::ALL
            .iter()
            .map(|stream| {
                let (path, url) = match stream {
                    LogStream::Enterleave => (&self.enterleave_path, &self.enterleave_url),
                    LogStream::ServerState => (&self.server_state_path, &self.server_state_url),
                    LogStream::GameplayEvents => {
                        (&self.gameplay_events_path, &self.gameplay_events_url)
                    }
                };
                StreamLocation {
                    stream: *stream,
                    path: PathBuf::from(path),
                    url: url.clone(),
                }
            })
            .collect()
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            schema: RecordSchema {
                identity_field: self.identity_field.clone(),
                session_key_field: self.session_key_field.clone(),
                zones: self.zones.clone(),
            },
            berry_snapshot_interval_hours: self.berry_snapshot_interval_hours,
            poll_interval_seconds: self.poll_interval_seconds,
            chat_fingerprint: FingerprintMode::parse(&self.chat_fingerprint)
                .unwrap_or(FingerprintMode::SecondLine),
            top_runs_limit: self.top_runs_limit,
            top_runs_excluded_guids: self.top_runs_excluded_guids.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("TRIALS_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("TRIALS_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_STORAGE") {
            self.storage = value;
        }
        if let Ok(value) = env::var("TRIALS_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("TRIALS_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("TRIALS_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_ENTERLEAVE_PATH") {
            self.enterleave_path = value;
        }
        if let Ok(value) = env::var("TRIALS_SERVER_STATE_PATH") {
            self.server_state_path = value;
        }
        if let Ok(value) = env::var("TRIALS_GAMEPLAY_EVENTS_PATH") {
            self.gameplay_events_path = value;
        }
        if let Ok(value) = env::var("TRIALS_ENTERLEAVE_URL") {
            self.enterleave_url = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_SERVER_STATE_URL") {
            self.server_state_url = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_GAMEPLAY_EVENTS_URL") {
            self.gameplay_events_url = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_GEO_TABLE_PATH") {
            self.geo_table_path = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_IDENTITY_FIELD") {
            self.identity_field = value;
        }
        if let Ok(value) = env::var("TRIALS_SESSION_KEY_FIELD") {
            self.session_key_field = value;
        }
        if let Ok(value) = env::var("TRIALS_ZONES") {
            self.zones = parse_env_list(&value);
        }
        if let Ok(value) = env::var("TRIALS_BERRY_SNAPSHOT_INTERVAL_HOURS") {
            self.berry_snapshot_interval_hours =
                value.parse().unwrap_or(self.berry_snapshot_interval_hours);
        }
        if let Ok(value) = env::var("TRIALS_POLL_INTERVAL_SECONDS") {
            self.poll_interval_seconds = value.parse().unwrap_or(self.poll_interval_seconds);
        }
        if let Ok(value) = env::var("TRIALS_CHAT_FINGERPRINT") {
            self.chat_fingerprint = value;
        }
        if let Ok(value) = env::var("TRIALS_TOP_RUNS_LIMIT") {
            self.top_runs_limit = value.parse().unwrap_or(self.top_runs_limit);
        }
        if let Ok(value) = env::var("TRIALS_TOP_RUNS_EXCLUDED_GUIDS") {
            self.top_runs_excluded_guids = parse_env_list(&value);
        }
        if let Ok(value) = env::var("TRIALS_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("TRIALS_LOG_FORMAT") {
            self.log_format = value;
        }
        if let Ok(value) = env::var("TRIALS_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("TRIALS_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("TRIALS_DOWNLOAD_TIMEOUT_SECONDS") {
            self.download_timeout_seconds = value.parse().unwrap_or(self.download_timeout_seconds);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

fn parse_env_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Keeps the configured order; zone order drives the leaderboard layout.
fn normalize_zone_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let zone = value.trim().to_lowercase();
        if !zone.is_empty() && !out.contains(&zone) {
            out.push(zone);
        }
    }
    out
}

fn normalize_id_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = values
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
