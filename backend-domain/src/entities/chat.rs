// Chat entity

use serde::{Deserialize, Serialize};

use crate::value_objects::ChatKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    /// Session key as written on the chat line.
    pub session_key: String,
    /// Player identity resolved through this cycle's player dumps.
    pub identity: Option<String>,
    pub name: String,
    pub occurred: i64,
    pub in_server: String,
    pub kind: ChatKind,
    pub hash: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatLogQuery {
    pub limit: Option<usize>,
}
