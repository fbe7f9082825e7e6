use thiserror::Error;

/// Errors from the retrieval backend (embedding model or vector index).
///
/// These never degrade into an empty search result: an empty result is
/// reserved for "no data", a `BackendError` means the backend failed.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("index error: {0}")]
    Index(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
}

/// Errors raised while loading configuration, secrets, or prompt files.
///
/// Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required secret '{0}' is not set")]
    MissingSecret(String),

    #[error("invalid configuration in {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load prompt '{name}' from {path}: {message}")]
    Prompt {
        name: String,
        path: String,
        message: String,
    },
}
