// Active roster and alias entities

use serde::{Deserialize, Serialize};

use crate::entities::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRosterEntry {
    pub identity: String,
    pub zone: String,
    pub spectating: bool,
    pub afk: bool,
    pub spectated: Option<String>,
}

impl From<&PlayerRecord> for ActiveRosterEntry {
    fn from(player: &PlayerRecord) -> Self {
        Self {
            identity: player.identity.clone(),
            zone: player.session.zone.clone(),
            spectating: player.session.spectating,
            afk: player.session.afk,
            spectated: player.session.spectated.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub identity: String,
    pub name: String,
}

impl From<&PlayerRecord> for Alias {
    fn from(player: &PlayerRecord) -> Self {
        Self {
            identity: player.identity.clone(),
            name: player.name.clone(),
        }
    }
}

/// Roster entry joined with the player row, as shown on the website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePlayerView {
    pub identity: String,
    pub name: String,
    pub zone: String,
    pub spectating: bool,
    pub afk: bool,
    pub spectated: Option<String>,
    pub berries: i64,
    pub country: String,
    pub country_code: String,
}
