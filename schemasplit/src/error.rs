//! Error types for explode and implode operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::token::EntityKind;

/// Result type for schema split operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Errors that abort an explode or implode.
///
/// Every variant is fatal for the operation that raised it. Both directions
/// are deterministic, so nothing here is retried.
#[derive(Debug, Error)]
pub enum SplitError {
    /// A token does not have the `namespace:module:name` shape.
    #[error("malformed token '{token}': {reason}")]
    MalformedToken { token: String, reason: String },

    /// Implode could not find a `base.*` file.
    #[error("no base file found (expected base.json or base.yaml)")]
    MissingBaseFile,

    /// A file extension matches neither supported encoding.
    #[error("unknown encoding for {path}: expected .json, .yaml or .yml")]
    UnknownEncoding { path: String },

    /// More than one file claims the same logical slot.
    #[error("ambiguous {slot}: found {}", .paths.join(", "))]
    AmbiguousEncoding { slot: String, paths: Vec<String> },

    /// Two entity files carry the same `$token`.
    #[error("duplicate {kind} token '{token}' in {first} and {second}")]
    DuplicateToken {
        kind: EntityKind,
        token: String,
        first: String,
        second: String,
    },

    /// Two tokens resolve to the same file path.
    #[error("tokens '{first}' and '{second}' both map to {path}")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    /// An entity cannot be written or read back.
    #[error("invalid {kind} entity '{token}': {reason}")]
    InvalidEntity {
        kind: EntityKind,
        token: String,
        reason: String,
    },

    /// An entity file has no string `$token` field.
    #[error("entity file {path} has no $token field")]
    MissingToken { path: String },

    /// The document (or a file of it) does not have the expected shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Text could not be decoded.
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// A value could not be encoded.
    #[error("failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },

    /// A discovery pattern is not a valid glob.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Failed to read a file.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or create its parent directory.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },
}

impl SplitError {
    pub(crate) fn malformed_token(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}
