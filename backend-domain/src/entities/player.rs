// Player entity
// One observation of a player taken from a `[playerinfojson]` dump

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{GeoInfo, RecordSchema};
use crate::error::RecordError;

const STAT_FIELDS: [&str; 8] = [
    "name",
    "berries",
    "items",
    "challenges",
    "runs",
    "timeplayed",
    "epochtime",
    "motto",
];
const SESSION_FIELDS: [&str; 6] = ["vip", "zone", "spec", "afk", "specBuid", "specGuid"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub berries: i64,
    pub items: i64,
    pub challenges: i64,
    pub runs: i64,
    pub timeplayed: i64,
    pub epochtime: i64,
    pub motto: String,
    pub vip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneProgress {
    pub best_time: i64,
    pub saves_loads: Option<i64>,
    pub epoch: Option<String>,
    pub splits: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub zone: String,
    pub spectating: bool,
    pub afk: bool,
    pub spectated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub identity: String,
    pub session_key: Option<String>,
    pub name: String,
    pub stats: PlayerStats,
    pub zones: BTreeMap<String, ZoneProgress>,
    pub session: SessionState,
    pub extra: BTreeMap<String, String>,
    pub ip: Option<String>,
    pub location: Option<GeoInfo>,
    pub visited: i64,
}

impl PlayerRecord {
    pub fn from_value(value: Value, schema: &RecordSchema) -> Result<Self, RecordError> {
        let Value::Object(obj) = value else {
            return Err(RecordError::NotAnObject);
        };

        let identity = text(&obj, &schema.identity_field)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| RecordError::MissingField(schema.identity_field.clone()))?;
        let session_key = text(&obj, &schema.session_key_field).filter(|raw| !raw.is_empty());

        let stats = PlayerStats {
            berries: integer(&obj, "berries"),
            items: integer(&obj, "items"),
            challenges: integer(&obj, "challenges"),
            runs: integer(&obj, "runs"),
            timeplayed: integer(&obj, "timeplayed"),
            epochtime: integer(&obj, "epochtime"),
            motto: text(&obj, "motto").unwrap_or_default(),
            vip: text(&obj, "vip").unwrap_or_default(),
        };

        let mut consumed: Vec<String> = STAT_FIELDS
            .iter()
            .chain(SESSION_FIELDS.iter())
            .map(|field| field.to_string())
            .collect();
        consumed.push(schema.identity_field.clone());
        consumed.push(schema.session_key_field.clone());

        let mut zones = BTreeMap::new();
        for zone in &schema.zones {
            let saves_key = format!("{zone}_saves_loads");
            let epoch_key = format!("{zone}_epoch");
            let splits_key = format!("{zone}_splits");
            zones.insert(
                zone.clone(),
                ZoneProgress {
                    best_time: integer(&obj, zone),
                    saves_loads: obj.get(&saves_key).map(as_integer),
                    epoch: text(&obj, &epoch_key),
                    splits: text(&obj, &splits_key),
                },
            );
            consumed.extend([zone.clone(), saves_key, epoch_key, splits_key]);
        }

        let session = SessionState {
            zone: text(&obj, "zone").unwrap_or_default(),
            spectating: obj.get("spec").map(truthy).unwrap_or(false),
            afk: obj.get("afk").map(truthy).unwrap_or(false),
            spectated: text(&obj, "specBuid")
                .or_else(|| text(&obj, "specGuid"))
                .filter(|raw| !raw.is_empty() && raw != "undefined"),
        };

        let extra = obj
            .iter()
            .filter(|(key, _)| !consumed.iter().any(|field| field == *key))
            .filter_map(|(key, value)| scalar(value).map(|raw| (key.clone(), raw)))
            .collect();

        Ok(Self {
            identity,
            session_key,
            name: text(&obj, "name").unwrap_or_default(),
            stats,
            zones,
            session,
            extra,
            ip: None,
            location: None,
            visited: 0,
        })
    }

    pub fn best_time(&self, zone: &str) -> i64 {
        self.zones.get(zone).map(|progress| progress.best_time).unwrap_or(0)
    }

    /// Key used to correlate with the connect/disconnect stream.
    pub fn correlation_key(&self) -> &str {
        self.session_key.as_deref().unwrap_or(&self.identity)
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar)
}

fn integer(obj: &Map<String, Value>, key: &str) -> i64 {
    obj.get(key).map(as_integer).unwrap_or(0)
}

pub(crate) fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn as_integer(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|raw| raw as i64))
            .unwrap_or(0),
        Value::String(raw) => {
            let trimmed = raw.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|raw| raw as i64))
                .unwrap_or(0)
        }
        Value::Bool(flag) => i64::from(*flag),
        _ => 0,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64().map(|raw| raw != 0).unwrap_or(false),
        Value::String(raw) => matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_encoded_fields() {
        let schema = RecordSchema::default();
        let value = json!({
            "buid": "b1",
            "guid": "g1",
            "name": "Bob",
            "berries": "10",
            "easy": "1500",
            "easy_saves_loads": "3",
            "easy_epoch": "1690000000",
            "zone": "easy",
            "spec": "1",
            "afk": "0",
            "specBuid": "b2",
            "pk_wins": "4"
        });
        let player = PlayerRecord::from_value(value, &schema).expect("player");
        assert_eq!(player.identity, "b1");
        assert_eq!(player.session_key.as_deref(), Some("g1"));
        assert_eq!(player.stats.berries, 10);
        assert_eq!(player.best_time("easy"), 1500);
        assert_eq!(player.best_time("hard"), 0);
        assert_eq!(player.zones["easy"].saves_loads, Some(3));
        assert!(player.session.spectating);
        assert!(!player.session.afk);
        assert_eq!(player.session.spectated.as_deref(), Some("b2"));
        assert_eq!(player.extra.get("pk_wins").map(String::as_str), Some("4"));
        assert!(!player.extra.contains_key("easy_epoch"));
    }

    #[test]
    fn missing_identity_is_an_error() {
        let schema = RecordSchema::default();
        let err = PlayerRecord::from_value(json!({"guid": "g1"}), &schema).unwrap_err();
        assert!(matches!(err, RecordError::MissingField(field) if field == "buid"));
    }

    #[test]
    fn correlation_falls_back_to_identity() {
        let schema = RecordSchema {
            identity_field: "guid".to_string(),
            session_key_field: "guid".to_string(),
            zones: vec!["easy".to_string(), "slide".to_string()],
        };
        let player = PlayerRecord::from_value(json!({"guid": "abc", "slide": 900}), &schema)
            .expect("player");
        assert_eq!(player.correlation_key(), "abc");
        assert_eq!(player.best_time("slide"), 900);
    }
}
