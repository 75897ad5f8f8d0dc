use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Malformed upload payload: {0}")]
    MalformedPayload(String),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type FinanceResult<T> = Result<T, FinanceError>;
