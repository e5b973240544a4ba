// Berry snapshot entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerrySnapshot {
    pub identity: String,
    pub name: String,
    pub berries: i64,
    pub occurred: i64,
}
