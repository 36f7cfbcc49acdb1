use thiserror::Error;

/// Core error type shared across hsim crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema source could not be read or parsed.
    #[error("failed to load schema: {0}")]
    SchemaLoad(String),
    /// A key referenced by a template or caller is absent from the schema index.
    #[error("unknown schema key: {0}")]
    UnknownSchemaKey(String),
    /// A schema node lacks an attribute required to resolve it.
    #[error("schema node '{key}' is missing attribute '{attribute}'")]
    MissingAttribute { key: String, attribute: &'static str },
    /// A field key has no column in the given record layout.
    #[error("column '{column}' not found in '{schema}'")]
    UnknownColumn { schema: String, column: String },
}

/// Convenience alias for results returned by hsim crates.
pub type Result<T> = std::result::Result<T, Error>;
