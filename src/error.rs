//! Error types shared by the query adapter, the route table and the server shell.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by this crate.
///
/// Shape mismatches (zero or several rows where one was expected) and statement
/// failures are not errors: they surface as `None` sentinels and through
/// `QueryResult::succeeded`.
#[derive(Debug, Error)]
pub enum Error {
    /// A route or configuration value failed validation at startup.
    #[error("configuration error for '{}': {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    /// An operation was attempted on a resource in the wrong lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Reading a served file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database could not be opened or a statement could not be prepared.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The configuration sources could not be loaded or deserialized.
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn configuration(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
