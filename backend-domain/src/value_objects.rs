// Domain value objects
pub mod chat_kind;
pub mod fingerprint_mode;
pub mod log_stream;
pub mod run_decision;

pub use chat_kind::*;
pub use fingerprint_mode::*;
pub use log_stream::*;
pub use run_decision::*;
