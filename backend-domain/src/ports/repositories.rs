use async_trait::async_trait;

use crate::entities::{
    ActivePlayerView,
    ActiveRosterEntry,
    Alias,
    BerrySnapshot,
    ChatMessage,
    PlayerRecord,
    RunRecord,
    ServerRunEvent,
    TopRunRow,
};

#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn upsert_player(&self, player: &PlayerRecord) -> anyhow::Result<()>;
    async fn upsert_alias(&self, alias: &Alias) -> anyhow::Result<()>;
    async fn upsert_active_roster_entry(&self, entry: &ActiveRosterEntry) -> anyhow::Result<()>;
    /// Set-difference delete; an empty slice clears the roster.
    async fn delete_active_roster_entries_not_in(&self, identities: &[String]) -> anyhow::Result<()>;
    async fn list_active_players(&self) -> anyhow::Result<Vec<ActivePlayerView>>;
    async fn top_runs(
        &self,
        zone: &str,
        excluded_session_keys: &[String],
        limit: usize,
    ) -> anyhow::Result<Vec<TopRunRow>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Lowest retained time for the pair, placeholder included.
    async fn query_best_run(&self, identity: &str, zone: &str) -> anyhow::Result<Option<i64>>;
    async fn insert_run(&self, run: &RunRecord) -> anyhow::Result<()>;
    async fn delete_zero_run(&self, identity: &str, zone: &str) -> anyhow::Result<()>;
    /// Returns `false` when the uniqId was already stored.
    async fn insert_server_run_if_absent(&self, event: &ServerRunEvent) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Returns `false` when the hash was already stored.
    async fn insert_chat_message_if_absent(&self, message: &ChatMessage) -> anyhow::Result<bool>;
    async fn list_chat_messages(&self, limit: Option<usize>) -> anyhow::Result<Vec<ChatMessage>>;
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn latest_berry_snapshot(&self, identity: &str) -> anyhow::Result<Option<BerrySnapshot>>;
    async fn insert_berry_snapshot(&self, snapshot: &BerrySnapshot) -> anyhow::Result<()>;
}
