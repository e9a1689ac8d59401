//! Error types for lexicard.
//!
//! One enum covers the whole crate. The HTTP layer maps it onto status codes:
//! [`Error::Validation`] becomes 400, [`Error::NotFound`] 404, and every other
//! variant a generic 500.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong in lexicard.
#[derive(Error, Debug)]
pub enum Error {
    /// The card database could not be opened or created.
    #[error("cannot open card database {path}: {source}")]
    DatabaseOpen {
        /// Database file.
        path: PathBuf,
        /// Cause reported by `SQLite`.
        #[source]
        source: rusqlite::Error,
    },

    /// A statement against the card database failed.
    #[error("sqlite: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The schema could not be brought to the supported version.
    #[error("schema migration: {message}")]
    DatabaseMigration {
        /// What went wrong.
        message: String,
    },

    /// Configuration sources could not be merged or parsed.
    #[error("cannot load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Which setting is wrong and why.
        message: String,
    },

    /// Caller input is not a valid card or request.
    #[error("{message}")]
    Validation {
        /// Message shown to the caller as is.
        message: String,
    },

    /// No card has the given id.
    #[error("card not found: {id}")]
    NotFound {
        /// Id that was looked up.
        id: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A data directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    DirectoryCreate {
        /// Directory that was being created.
        path: PathBuf,
        /// Cause reported by the OS.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// A validation error with a caller-facing message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// A not-found error for card `id`.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Whether the requested card does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the caller sent invalid input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
