use std::sync::Arc;

use backend_domain::ports::{
    ChatRepository, GeoLookup, HealthCheckService, LogSource, LogTransport, PlayerRepository,
    RunRepository, SnapshotRepository,
};
use backend_domain::{IngestStatus, PlayerRecord, RuntimeConfig};
use tokio::sync::RwLock;

use crate::ops::CycleGuard;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub player_repo: Arc<dyn PlayerRepository>,
    pub run_repo: Arc<dyn RunRepository>,
    pub chat_repo: Arc<dyn ChatRepository>,
    pub snapshot_repo: Arc<dyn SnapshotRepository>,
    pub geo: Arc<dyn GeoLookup>,
    pub log_source: Arc<dyn LogSource>,
    /// `None` when the streams are only read from local files.
    pub log_transport: Option<Arc<dyn LogTransport>>,
    pub health: Arc<dyn HealthCheckService>,
    pub metrics: Arc<Metrics>,
    pub cycle_guard: Arc<CycleGuard>,
    /// Final roster of the previous cycle.
    pub roster: Arc<RwLock<Vec<PlayerRecord>>>,
    pub ingest_status: Arc<RwLock<IngestStatus>>,
}
