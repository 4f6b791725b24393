//! Error types for ordered output handling.

use thiserror::Error;

/// Errors that can occur while rendering or hashing ordered output.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested output format is not supported.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// YAML serialization error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ordering crate operations.
pub type Result<T> = std::result::Result<T, Error>;
