use crate::AppState;
use backend_domain::IngestStatus;

pub async fn get_ingest_status(state: &AppState) -> IngestStatus {
    let mut status = state.ingest_status.read().await.clone();
    status.running = state.cycle_guard.is_running();
    status
}
