use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tokio::sync::RwLock;
use tracing::{info, warn};

use backend_application::ops::CycleGuard;
use backend_application::{AppState, Metrics};
use backend_domain::ports::{
    ChatRepository, GeoLookup, LogTransport, PlayerRepository, RunRepository, SnapshotRepository,
};
use backend_domain::IngestStatus;
use backend_infrastructure::{
    AppConfig, ClickhouseRepo, DefaultHealthService, FileLogSource, GeoTable, HttpLogTransport,
    MemoryRepository, StorageKind,
};

pub struct AppContext {
    pub state: AppState,
}

struct Repositories {
    players: Arc<dyn PlayerRepository>,
    runs: Arc<dyn RunRepository>,
    chat: Arc<dyn ChatRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let repos = build_repositories(config).await?;
        repos.players.ensure_schema().await?;

        let geo: Arc<dyn GeoLookup> = match &config.geo_table_path {
            Some(path) => {
                let table = GeoTable::load(Path::new(path)).await?;
                info!(ranges = table.len(), "geo table loaded");
                Arc::new(table)
            }
            None => {
                warn!("no geo table configured, players will be stored without location");
                Arc::new(GeoTable::empty())
            }
        };

        let locations = config.stream_locations();
        let log_transport = HttpLogTransport::from_locations(
            &locations,
            config.download_timeout_seconds,
        )?
        .map(|transport| Arc::new(transport) as Arc<dyn LogTransport>);

        let state = AppState {
            config: runtime_config,
            player_repo: repos.players.clone(),
            run_repo: repos.runs,
            chat_repo: repos.chat,
            snapshot_repo: repos.snapshots,
            geo,
            log_source: Arc::new(FileLogSource::new(&locations)),
            log_transport,
            health: Arc::new(DefaultHealthService::new(repos.players)),
            metrics: Arc::new(Metrics::default()),
            cycle_guard: Arc::new(CycleGuard::default()),
            roster: Arc::new(RwLock::new(Vec::new())),
            ingest_status: Arc::new(RwLock::new(IngestStatus::default())),
        };

        Ok(Self { state })
    }
}

async fn build_repositories(config: &AppConfig) -> Result<Repositories> {
    match config.storage_kind()? {
        StorageKind::Memory => {
            warn!("using in-memory storage, data is lost on restart");
            let repo = Arc::new(MemoryRepository::new());
            Ok(Repositories {
                players: repo.clone(),
                runs: repo.clone(),
                chat: repo.clone(),
                snapshots: repo,
            })
        }
        StorageKind::Clickhouse => {
            let db_config = config.to_db_config();
            let mut clickhouse = Client::default()
                .with_url(&db_config.clickhouse_url)
                .with_database(&db_config.clickhouse_database);
            if let Some(user) = &db_config.clickhouse_user {
                clickhouse = clickhouse.with_user(user);
            }
            if let Some(password) = &db_config.clickhouse_password {
                clickhouse = clickhouse.with_password(password);
            }

            let repo = Arc::new(ClickhouseRepo::new(
                clickhouse,
                db_config.clickhouse_database.clone(),
            ));
            Ok(Repositories {
                players: repo.clone(),
                runs: repo.clone(),
                chat: repo.clone(),
                snapshots: repo,
            })
        }
    }
}
