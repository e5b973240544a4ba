use tracing::error;

use crate::{AppError, AppState};
use backend_domain::ActivePlayerView;

pub async fn list_active_players(state: &AppState) -> Result<Vec<ActivePlayerView>, AppError> {
    state.player_repo.list_active_players().await.map_err(|err| {
        error!("failed to fetch active players: {}", err);
        AppError::Internal(err)
    })
}
