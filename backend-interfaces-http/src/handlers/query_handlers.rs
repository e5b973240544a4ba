use axum::extract::{Query, State};
use axum::Json;

use backend_application::queries::{chat_queries, leaderboard_queries, roster_queries};
use backend_application::AppState;
use backend_domain::{ActivePlayerView, ChatLogQuery, ChatMessage, Leaderboard};

use crate::error::HttpError;

pub async fn get_leaderboard(State(state): State<AppState>) -> Result<Json<Leaderboard>, HttpError> {
    let leaderboard = leaderboard_queries::get_leaderboard(&state).await?;
    Ok(Json(leaderboard))
}

pub async fn list_active_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<ActivePlayerView>>, HttpError> {
    let players = roster_queries::list_active_players(&state).await?;
    Ok(Json(players))
}

pub async fn list_chat_log(
    State(state): State<AppState>,
    Query(query): Query<ChatLogQuery>,
) -> Result<Json<Vec<ChatMessage>>, HttpError> {
    let messages = chat_queries::list_chat_log(&state, query).await?;
    Ok(Json(messages))
}
