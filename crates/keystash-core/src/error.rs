//! # Keystash Errors
//!
//! Defines [`Error`], the single error type for every storage operation,
//! and the [`Result`] shorthand used throughout the crate.
//!
//! Read-side failures ([`Error::NotFound`], [`Error::Deserialization`] and
//! [`Error::Io`] raised while reading an entry) are folded into `None` by
//! the lenient `get` calls. Everything else always reaches the caller.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A key or value could not be turned into its JSON form.
    #[error("Failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No entry is stored for the key id.
    #[error("No entry for key id '{id}'{}", path.as_ref().map(|p| format!(" at '{}'", p.display())).unwrap_or_default())]
    NotFound { id: String, path: Option<PathBuf> },

    /// The entry exists but its content is not valid JSON.
    #[error("Failed to deserialize entry '{}': {source}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<memory>".into()))]
    Deserialization {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure (directory creation, write, delete, read).
    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid domain scope '{scope}': {reason}")]
    InvalidScope { scope: String, reason: String },

    #[error("Configuration error in '{}': {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<environment>".into()))]
    Config {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Wrap an I/O error with the operation and path it happened on.
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    pub fn config(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Error::Config {
            path,
            message: message.into(),
        }
    }

    /// True for the failures a lenient read reports as "absent".
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. } | Error::Deserialization { .. } | Error::Io { .. }
        )
    }
}
