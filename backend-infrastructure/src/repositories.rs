pub mod clickhouse_repo;
pub mod memory;

pub use clickhouse_repo::*;
pub use memory::*;

/// Stored in place of location fields the lookup could not fill.
pub const NOT_AVAILABLE: &str = "N/A";
