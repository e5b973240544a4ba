use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::info;

use backend_application::commands::ingest_commands;
use backend_application::queries::ingest_queries;
use backend_application::AppState;
use backend_domain::{CycleReport, IngestStatus};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_ingest_status(State(state): State<AppState>) -> Json<IngestStatus> {
    Json(ingest_queries::get_ingest_status(&state).await)
}

/// Manual trigger; answers 409 while a scheduled cycle is running.
pub async fn trigger_ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CycleReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    info!("manual ingest cycle requested");
    let report = ingest_commands::run_ingest_cycle(&state).await?;
    Ok(Json(report))
}
