use thiserror::Error;

/// Errors emitted by dataset verification.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("dataset schema error: {0}")]
    Schema(String),
    #[error("verification failed with {0} violation(s)")]
    Violations(u64),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
