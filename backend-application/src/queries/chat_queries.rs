use tracing::error;

use crate::{AppError, AppState};
use backend_domain::{ChatLogQuery, ChatMessage};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

pub async fn list_chat_log(state: &AppState, query: ChatLogQuery) -> Result<Vec<ChatMessage>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let rows = state
        .chat_repo
        .list_chat_messages(Some(limit))
        .await
        .map_err(|err| {
            error!("failed to fetch chat log: {}", err);
            AppError::Internal(err)
        })?;
    Ok(rows)
}
