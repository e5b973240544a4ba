pub mod geo_service;
pub mod health_service;
pub mod http_transport;
pub mod log_source;
pub mod scheduler;

pub use geo_service::*;
pub use health_service::*;
pub use http_transport::*;
pub use log_source::*;
pub use scheduler::*;
