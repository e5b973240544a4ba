// Run entities
// Retained personal bests and raw completed-run events

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::player::{as_integer, scalar};
use crate::error::RecordError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub identity: String,
    pub zone: String,
    pub time: i64,
    pub occurred: i64,
}

impl RunRecord {
    pub fn is_placeholder(&self) -> bool {
        self.time == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRunEvent {
    pub uniq_id: String,
    pub identity: String,
    pub name: String,
    pub zone: String,
    pub time: i64,
    pub occurred: i64,
}

impl ServerRunEvent {
    pub fn from_value(value: Value, identity_field: &str, occurred: i64) -> Result<Self, RecordError> {
        let Value::Object(obj) = value else {
            return Err(RecordError::NotAnObject);
        };
        let uniq_id = obj
            .get("uniqId")
            .and_then(scalar)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| RecordError::MissingField("uniqId".to_string()))?;
        Ok(Self {
            uniq_id,
            identity: obj.get(identity_field).and_then(scalar).unwrap_or_default(),
            name: obj.get("name").and_then(scalar).unwrap_or_default(),
            zone: obj.get("zone").and_then(scalar).unwrap_or_default(),
            time: obj.get("time").map(as_integer).unwrap_or(0),
            occurred,
        })
    }
}
