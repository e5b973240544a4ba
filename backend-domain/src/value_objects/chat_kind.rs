// Chat message kind value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Say,
    SayTeam,
    SaySpecial,
}

impl ChatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Say => "say",
            ChatKind::SayTeam => "say_team",
            ChatKind::SaySpecial => "say_special",
        }
    }

    /// Classifies a raw log line; team and special are checked before plain say.
    pub fn detect(line: &str) -> Option<Self> {
        if line.contains("say_team;") {
            Some(ChatKind::SayTeam)
        } else if line.contains("say_special;") {
            Some(ChatKind::SaySpecial)
        } else if line.contains("say;") {
            Some(ChatKind::Say)
        } else {
            None
        }
    }
}

impl From<&str> for ChatKind {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "say_team" => ChatKind::SayTeam,
            "say_special" => ChatKind::SaySpecial,
            _ => ChatKind::Say,
        }
    }
}
