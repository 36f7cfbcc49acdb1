use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("schema error: {0}")]
    Schema(#[from] hsim_core::Error),
    #[error("lookup index {index} out of range for '{field}' ({len} entries)")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
    #[error("identifier '{0}' has no numeric root index")]
    InvalidIdentifier(String),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
