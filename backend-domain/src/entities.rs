// Domain entities

pub mod chat;
pub mod config;
pub mod geo;
pub mod leaderboard;
pub mod player;
pub mod roster;
pub mod run;
pub mod snapshot;
pub mod status;

pub use chat::*;
pub use config::*;
pub use geo::*;
pub use leaderboard::*;
pub use player::*;
pub use roster::*;
pub use run::*;
pub use snapshot::*;
pub use status::*;
