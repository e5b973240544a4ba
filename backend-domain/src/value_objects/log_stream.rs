// Log stream value object

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogStream {
    /// Connect/disconnect events (`enterleave.log`).
    Enterleave,
    /// Periodic player and run dumps (`server_log.txt`).
    ServerState,
    /// Chat and run dumps (`games_mp.log`).
    GameplayEvents,
}

impl LogStream {
    pub const ALL: [LogStream; 3] = [
        LogStream::Enterleave,
        LogStream::ServerState,
        LogStream::GameplayEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogStream::Enterleave => "ENTERLEAVE",
            LogStream::ServerState => "SERVER_STATE",
            LogStream::GameplayEvents => "GAMEPLAY_EVENTS",
        }
    }
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
