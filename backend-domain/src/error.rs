use thiserror::Error;

/// Failure to turn one captured log fragment into a typed record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid record json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record is not an object")]
    NotAnObject,
    #[error("record is missing field '{0}'")]
    MissingField(String),
}
