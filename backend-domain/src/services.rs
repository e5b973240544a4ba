// Domain services: the pure parts of one ingestion cycle

pub mod capture;
pub mod chat_extractor;
pub mod roster;
pub mod run_policy;
pub mod sanitizer;
pub mod session_index;
pub mod snapshot_policy;
pub mod time_format;

pub use capture::*;
pub use chat_extractor::*;
pub use roster::*;
pub use run_policy::*;
pub use sanitizer::*;
pub use session_index::*;
pub use snapshot_policy::*;
pub use time_format::*;
