use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use backend_domain::ports::{ChatRepository, PlayerRepository, RunRepository, SnapshotRepository};
use backend_domain::{
    ActivePlayerView, ActiveRosterEntry, Alias, BerrySnapshot, ChatKind, ChatMessage,
    PlayerRecord, RunRecord, ServerRunEvent, TopRunRow,
};

use crate::repositories::NOT_AVAILABLE;
use crate::utils::{millis_to_utc, utc_to_millis};

const SCHEMA: [&str; 8] = [
    r#"
CREATE TABLE IF NOT EXISTS players (
    identity String,
    session_key String,
    name String,
    berries Int64,
    items Int64,
    challenges Int64,
    runs Int64,
    timeplayed Int64,
    epochtime Int64,
    motto String,
    vip String,
    ip String,
    country String,
    country_code String,
    city String,
    latlong String,
    extra_json String,
    visited DateTime64(3)
) ENGINE = ReplacingMergeTree(visited)
ORDER BY identity
"#,
    r#"
CREATE TABLE IF NOT EXISTS player_zones (
    identity String,
    zone String,
    best_time Int64,
    saves_loads Nullable(Int64),
    epoch Nullable(String),
    splits Nullable(String),
    visited DateTime64(3)
) ENGINE = ReplacingMergeTree(visited)
ORDER BY (identity, zone)
"#,
    r#"
CREATE TABLE IF NOT EXISTS active_players (
    identity String,
    zone String,
    spectating UInt8,
    afk UInt8,
    spectated String
) ENGINE = ReplacingMergeTree
ORDER BY identity
"#,
    r#"
CREATE TABLE IF NOT EXISTS aliases (
    identity String,
    name String
) ENGINE = ReplacingMergeTree
ORDER BY identity
"#,
    r#"
CREATE TABLE IF NOT EXISTS runs (
    identity String,
    zone String,
    time Int64,
    occurred DateTime64(3)
) ENGINE = MergeTree
ORDER BY (identity, zone, occurred)
"#,
    r#"
CREATE TABLE IF NOT EXISTS server_runs (
    uniq_id String,
    identity String,
    name String,
    zone String,
    time Int64,
    occurred DateTime64(3)
) ENGINE = ReplacingMergeTree
ORDER BY uniq_id
"#,
    r#"
CREATE TABLE IF NOT EXISTS chatlog (
    hash String,
    message String,
    session_key String,
    identity Nullable(String),
    name String,
    occurred DateTime64(3),
    in_server String,
    kind String
) ENGINE = ReplacingMergeTree
ORDER BY hash
"#,
    r#"
CREATE TABLE IF NOT EXISTS berries_snapshot (
    identity String,
    name String,
    berries Int64,
    occurred DateTime64(3)
) ENGINE = MergeTree
ORDER BY (identity, occurred)
"#,
];

#[derive(Debug, Clone, Serialize, Row)]
struct PlayerRow {
    identity: String,
    session_key: String,
    name: String,
    berries: i64,
    items: i64,
    challenges: i64,
    runs: i64,
    timeplayed: i64,
    epochtime: i64,
    motto: String,
    vip: String,
    ip: String,
    country: String,
    country_code: String,
    city: String,
    latlong: String,
    extra_json: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    visited: OffsetDateTime,
}

impl PlayerRow {
    fn from_record(player: &PlayerRecord) -> Result<Self> {
        let location = player.location.as_ref();
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Ok(Self {
            identity: player.identity.clone(),
            session_key: player.session_key.clone().unwrap_or_default(),
            name: player.name.clone(),
            berries: player.stats.berries,
            items: player.stats.items,
            challenges: player.stats.challenges,
            runs: player.stats.runs,
            timeplayed: player.stats.timeplayed,
            epochtime: player.stats.epochtime,
            motto: player.stats.motto.clone(),
            vip: player.stats.vip.clone(),
            ip: player.ip.clone().unwrap_or_default(),
            country: or_na(location.map(|geo| geo.country.clone())),
            country_code: or_na(location.map(|geo| geo.country_code.clone())),
            city: or_na(location.map(|geo| geo.city.clone())),
            latlong: or_na(location.map(|geo| geo.latlong())),
            extra_json: serde_json::to_string(&player.extra)?,
            visited: millis_to_utc(player.visited),
        })
    }
}

#[derive(Debug, Clone, Serialize, Row)]
struct PlayerZoneRow {
    identity: String,
    zone: String,
    best_time: i64,
    saves_loads: Option<i64>,
    epoch: Option<String>,
    splits: Option<String>,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    visited: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct ActiveRosterRow {
    identity: String,
    zone: String,
    spectating: bool,
    afk: bool,
    spectated: String,
}

#[derive(Debug, Clone, Serialize, Row)]
struct AliasRow {
    identity: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize, Row)]
struct ActivePlayerRow {
    identity: String,
    name: String,
    zone: String,
    spectating: bool,
    afk: bool,
    spectated: String,
    berries: i64,
    country: String,
    country_code: String,
}

#[derive(Debug, Clone, Deserialize, Row)]
struct TopRunDbRow {
    identity: String,
    session_key: String,
    name: String,
    zone: String,
    best_time: i64,
    country_code: String,
}

#[derive(Debug, Clone, Serialize, Row)]
struct RunRow {
    identity: String,
    zone: String,
    time: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    occurred: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Row)]
struct ServerRunRow {
    uniq_id: String,
    identity: String,
    name: String,
    zone: String,
    time: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    occurred: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct ChatRow {
    hash: String,
    message: String,
    session_key: String,
    identity: Option<String>,
    name: String,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    occurred: OffsetDateTime,
    in_server: String,
    kind: String,
}

impl From<ChatRow> for ChatMessage {
    fn from(row: ChatRow) -> Self {
        Self {
            message: row.message,
            session_key: row.session_key,
            identity: row.identity,
            name: row.name,
            occurred: utc_to_millis(row.occurred),
            in_server: row.in_server,
            kind: ChatKind::from(row.kind.as_str()),
            hash: row.hash,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct SnapshotRow {
    identity: String,
    name: String,
    berries: i64,
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    occurred: OffsetDateTime,
}

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    async fn count(&self, sql: &str, key: &str) -> Result<u64> {
        let count = self.client.query(sql).bind(key).fetch_one::<u64>().await?;
        Ok(count)
    }
}

#[async_trait]
impl PlayerRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;
        for statement in SCHEMA {
            self.client.query(statement).execute().await?;
        }
        Ok(())
    }

    async fn upsert_player(&self, player: &PlayerRecord) -> Result<()> {
        let mut insert = self.client.insert("players")?;
        insert.write(&PlayerRow::from_record(player)?).await?;
        insert.end().await?;

        let visited = millis_to_utc(player.visited);
        let mut insert = self.client.insert("player_zones")?;
        for (zone, progress) in &player.zones {
            insert
                .write(&PlayerZoneRow {
                    identity: player.identity.clone(),
                    zone: zone.clone(),
                    best_time: progress.best_time,
                    saves_loads: progress.saves_loads,
                    epoch: progress.epoch.clone(),
                    splits: progress.splits.clone(),
                    visited,
                })
                .await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn upsert_alias(&self, alias: &Alias) -> Result<()> {
        let mut insert = self.client.insert("aliases")?;
        insert
            .write(&AliasRow {
                identity: alias.identity.clone(),
                name: alias.name.clone(),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn upsert_active_roster_entry(&self, entry: &ActiveRosterEntry) -> Result<()> {
        let mut insert = self.client.insert("active_players")?;
        insert
            .write(&ActiveRosterRow {
                identity: entry.identity.clone(),
                zone: entry.zone.clone(),
                spectating: entry.spectating,
                afk: entry.afk,
                spectated: entry.spectated.clone().unwrap_or_default(),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn delete_active_roster_entries_not_in(&self, identities: &[String]) -> Result<()> {
        if identities.is_empty() {
            self.client
                .query("TRUNCATE TABLE IF EXISTS active_players")
                .execute()
                .await?;
            return Ok(());
        }
        self.client
            .query("DELETE FROM active_players WHERE NOT has(?, identity)")
            .bind(identities)
            .execute()
            .await?;
        Ok(())
    }

    async fn list_active_players(&self) -> Result<Vec<ActivePlayerView>> {
        let rows = self
            .client
            .query(
                "SELECT a.identity, p.name, a.zone, a.spectating, a.afk, a.spectated, \
                 p.berries, p.country, p.country_code \
                 FROM (SELECT * FROM active_players FINAL) AS a \
                 INNER JOIN (SELECT identity, name, berries, country, country_code FROM players FINAL) AS p \
                 ON p.identity = a.identity \
                 ORDER BY p.name",
            )
            .fetch_all::<ActivePlayerRow>()
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ActivePlayerView {
                identity: row.identity,
                name: row.name,
                zone: row.zone,
                spectating: row.spectating,
                afk: row.afk,
                spectated: Some(row.spectated).filter(|raw| !raw.is_empty()),
                berries: row.berries,
                country: row.country,
                country_code: row.country_code,
            })
            .collect())
    }

    async fn top_runs(
        &self,
        zone: &str,
        excluded_session_keys: &[String],
        limit: usize,
    ) -> Result<Vec<TopRunRow>> {
        let mut sql = String::from(
            "SELECT z.identity, p.session_key, p.name, z.zone, z.best_time, p.country_code \
             FROM (SELECT identity, zone, best_time FROM player_zones FINAL WHERE zone = ? AND best_time != 0) AS z \
             INNER JOIN (SELECT identity, session_key, name, country_code FROM players FINAL) AS p \
             ON p.identity = z.identity",
        );
        if !excluded_session_keys.is_empty() {
            sql.push_str(" WHERE NOT has(?, p.session_key)");
        }
        sql.push_str(" ORDER BY abs(z.best_time) ASC LIMIT ?");

        let mut query = self.client.query(&sql).bind(zone);
        if !excluded_session_keys.is_empty() {
            query = query.bind(excluded_session_keys);
        }
        let rows = query.bind(limit as u64).fetch_all::<TopRunDbRow>().await?;
        Ok(rows
            .into_iter()
            .map(|row| TopRunRow {
                identity: row.identity,
                session_key: row.session_key,
                name: row.name,
                zone: row.zone,
                best_time: row.best_time,
                country_code: row.country_code,
            })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl RunRepository for ClickhouseRepo {
    async fn query_best_run(&self, identity: &str, zone: &str) -> Result<Option<i64>> {
        let (count, best) = self
            .client
            .query("SELECT count(), min(time) FROM runs WHERE identity = ? AND zone = ?")
            .bind(identity)
            .bind(zone)
            .fetch_one::<(u64, i64)>()
            .await?;
        Ok((count > 0).then_some(best))
    }

    async fn insert_run(&self, run: &RunRecord) -> Result<()> {
        let mut insert = self.client.insert("runs")?;
        insert
            .write(&RunRow {
                identity: run.identity.clone(),
                zone: run.zone.clone(),
                time: run.time,
                occurred: millis_to_utc(run.occurred),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }

    async fn delete_zero_run(&self, identity: &str, zone: &str) -> Result<()> {
        self.client
            .query("DELETE FROM runs WHERE identity = ? AND zone = ? AND time = 0")
            .bind(identity)
            .bind(zone)
            .execute()
            .await?;
        Ok(())
    }

    async fn insert_server_run_if_absent(&self, event: &ServerRunEvent) -> Result<bool> {
        let existing = self
            .count("SELECT count() FROM server_runs WHERE uniq_id = ?", &event.uniq_id)
            .await?;
        if existing > 0 {
            return Ok(false);
        }
        let mut insert = self.client.insert("server_runs")?;
        insert
            .write(&ServerRunRow {
                uniq_id: event.uniq_id.clone(),
                identity: event.identity.clone(),
                name: event.name.clone(),
                zone: event.zone.clone(),
                time: event.time,
                occurred: millis_to_utc(event.occurred),
            })
            .await?;
        insert.end().await?;
        Ok(true)
    }
}

#[async_trait]
impl ChatRepository for ClickhouseRepo {
    async fn insert_chat_message_if_absent(&self, message: &ChatMessage) -> Result<bool> {
        let existing = self
            .count("SELECT count() FROM chatlog WHERE hash = ?", &message.hash)
            .await?;
        if existing > 0 {
            return Ok(false);
        }
        let mut insert = self.client.insert("chatlog")?;
        insert
            .write(&ChatRow {
                hash: message.hash.clone(),
                message: message.message.clone(),
                session_key: message.session_key.clone(),
                identity: message.identity.clone(),
                name: message.name.clone(),
                occurred: millis_to_utc(message.occurred),
                in_server: message.in_server.clone(),
                kind: message.kind.as_str().to_string(),
            })
            .await?;
        insert.end().await?;
        Ok(true)
    }

    async fn list_chat_messages(&self, limit: Option<usize>) -> Result<Vec<ChatMessage>> {
        let rows = match limit {
            Some(limit) => {
                self.client
                    .query("SELECT ?fields FROM chatlog FINAL ORDER BY occurred DESC LIMIT ?")
                    .bind(limit as u64)
                    .fetch_all::<ChatRow>()
                    .await?
            }
            None => {
                self.client
                    .query("SELECT ?fields FROM chatlog FINAL ORDER BY occurred DESC")
                    .fetch_all::<ChatRow>()
                    .await?
            }
        };
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}

#[async_trait]
impl SnapshotRepository for ClickhouseRepo {
    async fn latest_berry_snapshot(&self, identity: &str) -> Result<Option<BerrySnapshot>> {
        let rows = self
            .client
            .query("SELECT ?fields FROM berries_snapshot WHERE identity = ? ORDER BY occurred DESC LIMIT 1")
            .bind(identity)
            .fetch_all::<SnapshotRow>()
            .await?;
        Ok(rows.into_iter().next().map(|row| BerrySnapshot {
            identity: row.identity,
            name: row.name,
            berries: row.berries,
            occurred: utc_to_millis(row.occurred),
        }))
    }

    async fn insert_berry_snapshot(&self, snapshot: &BerrySnapshot) -> Result<()> {
        let mut insert = self.client.insert("berries_snapshot")?;
        insert
            .write(&SnapshotRow {
                identity: snapshot.identity.clone(),
                name: snapshot.name.clone(),
                berries: snapshot.berries,
                occurred: millis_to_utc(snapshot.occurred),
            })
            .await?;
        insert.end().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::GeoInfo;

    #[test]
    fn player_row_fills_missing_location() {
        let mut player = PlayerRecord {
            identity: "b1".to_string(),
            visited: 1_700_000_000_000,
            ..PlayerRecord::default()
        };
        player.extra.insert("pk_wins".to_string(), "4".to_string());

        let row = PlayerRow::from_record(&player).expect("row");
        assert_eq!(row.country, NOT_AVAILABLE);
        assert_eq!(row.latlong, NOT_AVAILABLE);
        assert_eq!(row.extra_json, r#"{"pk_wins":"4"}"#);
        assert_eq!(utc_to_millis(row.visited), 1_700_000_000_000);

        player.location = Some(GeoInfo {
            country: "Germany".to_string(),
            country_code: "DE".to_string(),
            city: "Frankfurt am Main".to_string(),
            latitude: 50.1,
            longitude: 8.68,
        });
        let row = PlayerRow::from_record(&player).expect("row");
        assert_eq!(row.country_code, "DE");
        assert_eq!(row.latlong, "50.1, 8.68");
    }

    #[test]
    fn chat_row_maps_back_to_message() {
        let row = ChatRow {
            hash: "h".to_string(),
            message: "hi".to_string(),
            session_key: "g1".to_string(),
            identity: Some("b1".to_string()),
            name: "Bob".to_string(),
            occurred: millis_to_utc(42),
            in_server: "b1 b2".to_string(),
            kind: "say_team".to_string(),
        };
        let message = ChatMessage::from(row);
        assert_eq!(message.kind, ChatKind::SayTeam);
        assert_eq!(message.occurred, 42);
    }
}
