pub mod chat_queries;
pub mod ingest_queries;
pub mod leaderboard_queries;
pub mod roster_queries;
