// File: src/error.rs
use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the correction engine and its stores.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary model snapshot could not be encoded or decoded.
    #[error("model snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// The temporary file could not be renamed over the target.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
