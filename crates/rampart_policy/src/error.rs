//! Error types for policy document loading.

use thiserror::Error;

/// Errors that can occur while loading a policy document.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule carries a kind discriminant this model does not know.
    #[error("unknown rule kind '{kind}' at {path}")]
    UnknownRuleKind {
        /// JSON path of the offending rule.
        path: String,
        /// The discriminant that was found (empty if absent).
        kind: String,
    },

    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field is present but has the wrong shape.
    #[error("invalid field at {path}: {reason}")]
    InvalidField {
        /// JSON path of the offending field.
        path: String,
        /// Reason why the field is invalid.
        reason: String,
    },

    /// Document is not valid JSON or does not match the model.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, Error>;
