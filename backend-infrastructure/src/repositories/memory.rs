use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::ports::{ChatRepository, PlayerRepository, RunRepository, SnapshotRepository};
use backend_domain::{
    ActivePlayerView, ActiveRosterEntry, Alias, BerrySnapshot, ChatMessage, PlayerRecord,
    RunRecord, ServerRunEvent, TopRunRow,
};

use crate::repositories::NOT_AVAILABLE;

#[derive(Debug, Default)]
struct Tables {
    players: BTreeMap<String, PlayerRecord>,
    aliases: BTreeMap<String, String>,
    active: BTreeMap<String, ActiveRosterEntry>,
    runs: Vec<RunRecord>,
    server_runs: Vec<ServerRunEvent>,
    chat: Vec<ChatMessage>,
    snapshots: Vec<BerrySnapshot>,
}

/// Process-local store backing every repository port.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the named port operation return an error until cleared.
    pub fn fail_on(&self, operation: &'static str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(operation);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.clear();
        }
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        let failing = self
            .failing
            .lock()
            .map_err(|_| anyhow!("memory repository lock poisoned"))?;
        if failing.contains(operation) {
            return Err(anyhow!("{} failed", operation));
        }
        Ok(())
    }

    pub async fn player(&self, identity: &str) -> Option<PlayerRecord> {
        self.tables.read().await.players.get(identity).cloned()
    }

    pub async fn alias(&self, identity: &str) -> Option<String> {
        self.tables.read().await.aliases.get(identity).cloned()
    }

    pub async fn active_identities(&self) -> Vec<String> {
        self.tables.read().await.active.keys().cloned().collect()
    }

    pub async fn runs_for(&self, identity: &str, zone: &str) -> Vec<RunRecord> {
        let tables = self.tables.read().await;
        let mut runs: Vec<RunRecord> = tables
            .runs
            .iter()
            .filter(|run| run.identity == identity && run.zone == zone)
            .cloned()
            .collect();
        runs.sort_by_key(|run| run.occurred);
        runs
    }

    pub async fn server_runs(&self) -> Vec<ServerRunEvent> {
        self.tables.read().await.server_runs.clone()
    }

    pub async fn chat_messages(&self) -> Vec<ChatMessage> {
        self.tables.read().await.chat.clone()
    }

    pub async fn snapshots_for(&self, identity: &str) -> Vec<BerrySnapshot> {
        self.tables
            .read()
            .await
            .snapshots
            .iter()
            .filter(|snapshot| snapshot.identity == identity)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PlayerRepository for MemoryRepository {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_player(&self, player: &PlayerRecord) -> Result<()> {
        self.check("upsert_player")?;
        self.tables
            .write()
            .await
            .players
            .insert(player.identity.clone(), player.clone());
        Ok(())
    }

    async fn upsert_alias(&self, alias: &Alias) -> Result<()> {
        self.check("upsert_alias")?;
        self.tables
            .write()
            .await
            .aliases
            .insert(alias.identity.clone(), alias.name.clone());
        Ok(())
    }

    async fn upsert_active_roster_entry(&self, entry: &ActiveRosterEntry) -> Result<()> {
        self.check("upsert_active_roster_entry")?;
        self.tables
            .write()
            .await
            .active
            .insert(entry.identity.clone(), entry.clone());
        Ok(())
    }

    async fn delete_active_roster_entries_not_in(&self, identities: &[String]) -> Result<()> {
        self.check("delete_active_roster_entries_not_in")?;
        self.tables
            .write()
            .await
            .active
            .retain(|identity, _| identities.contains(identity));
        Ok(())
    }

    async fn list_active_players(&self) -> Result<Vec<ActivePlayerView>> {
        let tables = self.tables.read().await;
        let rows = tables
            .active
            .values()
            .filter_map(|entry| {
                let player = tables.players.get(&entry.identity)?;
                let (country, country_code) = match &player.location {
                    Some(geo) => (geo.country.clone(), geo.country_code.clone()),
                    None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
                };
                Some(ActivePlayerView {
                    identity: entry.identity.clone(),
                    name: player.name.clone(),
                    zone: entry.zone.clone(),
                    spectating: entry.spectating,
                    afk: entry.afk,
                    spectated: entry.spectated.clone(),
                    berries: player.stats.berries,
                    country,
                    country_code,
                })
            })
            .collect();
        Ok(rows)
    }

    async fn top_runs(
        &self,
        zone: &str,
        excluded_session_keys: &[String],
        limit: usize,
    ) -> Result<Vec<TopRunRow>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<TopRunRow> = tables
            .players
            .values()
            .filter(|player| {
                player
                    .session_key
                    .as_ref()
                    .map_or(true, |key| !excluded_session_keys.contains(key))
            })
            .filter(|player| player.best_time(zone) != 0)
            .map(|player| TopRunRow {
                identity: player.identity.clone(),
                session_key: player.session_key.clone().unwrap_or_default(),
                name: player.name.clone(),
                zone: zone.to_string(),
                best_time: player.best_time(zone),
                country_code: player
                    .location
                    .as_ref()
                    .map(|geo| geo.country_code.clone())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            })
            .collect();
        rows.sort_by_key(|row| row.best_time.abs());
        rows.truncate(limit);
        Ok(rows)
    }

    async fn ping(&self) -> Result<()> {
        self.check("ping")
    }
}

#[async_trait]
impl RunRepository for MemoryRepository {
    async fn query_best_run(&self, identity: &str, zone: &str) -> Result<Option<i64>> {
        self.check("query_best_run")?;
        let tables = self.tables.read().await;
        Ok(tables
            .runs
            .iter()
            .filter(|run| run.identity == identity && run.zone == zone)
            .map(|run| run.time)
            .min())
    }

    async fn insert_run(&self, run: &RunRecord) -> Result<()> {
        self.check("insert_run")?;
        self.tables.write().await.runs.push(run.clone());
        Ok(())
    }

    async fn delete_zero_run(&self, identity: &str, zone: &str) -> Result<()> {
        self.check("delete_zero_run")?;
        self.tables
            .write()
            .await
            .runs
            .retain(|run| !(run.identity == identity && run.zone == zone && run.is_placeholder()));
        Ok(())
    }

    async fn insert_server_run_if_absent(&self, event: &ServerRunEvent) -> Result<bool> {
        self.check("insert_server_run_if_absent")?;
        let mut tables = self.tables.write().await;
        if tables
            .server_runs
            .iter()
            .any(|existing| existing.uniq_id == event.uniq_id)
        {
            return Ok(false);
        }
        tables.server_runs.push(event.clone());
        Ok(true)
    }
}

#[async_trait]
impl ChatRepository for MemoryRepository {
    async fn insert_chat_message_if_absent(&self, message: &ChatMessage) -> Result<bool> {
        self.check("insert_chat_message_if_absent")?;
        let mut tables = self.tables.write().await;
        if tables.chat.iter().any(|existing| existing.hash == message.hash) {
            return Ok(false);
        }
        tables.chat.push(message.clone());
        Ok(true)
    }

    async fn list_chat_messages(&self, limit: Option<usize>) -> Result<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut rows = tables.chat.clone();
        rows.sort_by(|a, b| b.occurred.cmp(&a.occurred));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

#[async_trait]
impl SnapshotRepository for MemoryRepository {
    async fn latest_berry_snapshot(&self, identity: &str) -> Result<Option<BerrySnapshot>> {
        self.check("latest_berry_snapshot")?;
        let tables = self.tables.read().await;
        Ok(tables
            .snapshots
            .iter()
            .filter(|snapshot| snapshot.identity == identity)
            .max_by_key(|snapshot| snapshot.occurred)
            .cloned())
    }

    async fn insert_berry_snapshot(&self, snapshot: &BerrySnapshot) -> Result<()> {
        self.check("insert_berry_snapshot")?;
        self.tables.write().await.snapshots.push(snapshot.clone());
        Ok(())
    }
}
