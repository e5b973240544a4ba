use async_trait::async_trait;

use crate::entities::GeoInfo;
use crate::value_objects::LogStream;

pub trait GeoLookup: Send + Sync {
    fn lookup(&self, ip: &str) -> Option<GeoInfo>;
}

/// Latest local content of a log stream, one entry per line.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn read_lines(&self, stream: LogStream) -> anyhow::Result<Vec<String>>;
}

/// Brings the local copies of the log streams up to date.
#[async_trait]
pub trait LogTransport: Send + Sync {
    async fn refresh(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_database(&self) -> anyhow::Result<bool>;
}
