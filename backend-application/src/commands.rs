pub mod chat_commands;
pub mod ingest_commands;
pub mod player_commands;
pub mod roster_commands;
pub mod run_commands;
pub mod snapshot_commands;
