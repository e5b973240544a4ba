use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("an ingestion cycle is already running")]
    CycleInProgress,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
