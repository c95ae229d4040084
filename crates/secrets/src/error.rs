//! Error types for secret resolution.
//!
//! Responsibilities:
//! - Define error variants for every fatal failure of a resolution pass.
//!
//! Does NOT handle:
//! - Per-secret load failures; those are recovered where they happen and only logged.
//!
//! Invariants:
//! - All error variants include context for debugging (keys, paths, separators).
//! - No variant ever carries secret content or raw `.env` lines.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a secrets post-processing pass.
#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("Duplicate key {0}")]
    DuplicateKey(String),

    #[error("Unknown separator char '{0}'. Use '.' or '_'")]
    IllegalSeparator(String),

    #[error("Failed to list secrets directory at {path}")]
    DirectoryListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Property source '{0}' does not exist")]
    MissingPropertySource(String),

    #[error("Failed to read config data at {path}")]
    ConfigDataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config data at {path}")]
    ConfigDataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl SecretsError {
    pub(crate) fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}
