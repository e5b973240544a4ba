use axum::Router;

use backend_application::AppState;

use crate::handlers::{ingest_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/leaderboard",
            axum::routing::get(query_handlers::get_leaderboard),
        )
        .route(
            "/api/active-players",
            axum::routing::get(query_handlers::list_active_players),
        )
        .route(
            "/api/chat-log",
            axum::routing::get(query_handlers::list_chat_log),
        )
        .route(
            "/api/ingest/status",
            axum::routing::get(ingest_handlers::get_ingest_status),
        )
        .route(
            "/api/ingest/run",
            axum::routing::post(ingest_handlers::trigger_ingest),
        )
        .route("/ops/health/live", axum::routing::get(ops_handlers::health_live))
        .route("/ops/health/ready", axum::routing::get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
