// Chat dedup fingerprint value object

use serde::{Deserialize, Serialize};

/// Which neighbouring line is hashed together with a chat line.
///
/// `SecondLine` reproduces the historical fingerprint (current line plus the
/// second line of the whole stream). `PrecedingLine` hashes the current line
/// with the line right before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    SecondLine,
    PrecedingLine,
}

impl FingerprintMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintMode::SecondLine => "second_line",
            FingerprintMode::PrecedingLine => "preceding_line",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "second_line" => Some(FingerprintMode::SecondLine),
            "preceding_line" => Some(FingerprintMode::PrecedingLine),
            _ => None,
        }
    }
}
