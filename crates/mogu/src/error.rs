//! Error types for mogu.
//!
//! Only faults live here. Business-rule refusals (duplicates, missing
//! permissions, bad positions) are reported as
//! [`Rejection`](crate::dispatch::Rejection) values instead.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mogu operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to write the record file.
    #[error("failed to write restaurant list to {path}: {source}")]
    StoreWrite {
        /// Path to the record file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record file was written by a newer version of mogu.
    #[error("unsupported record file version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Event Errors ===
    /// The inbound event named a command this bot does not know.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The command identifier as received.
        name: String,
    },

    /// The inbound event could not be turned into a command.
    #[error("invalid event: {message}")]
    InvalidEvent {
        /// Description of what was wrong with the event.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for mogu operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new invalid event error.
    #[must_use]
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create an unknown command error.
    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Check if this error was caused by a malformed inbound event rather
    /// than a storage or configuration fault.
    #[must_use]
    pub fn is_event_error(&self) -> bool {
        matches!(self, Self::UnknownCommand { .. } | Self::InvalidEvent { .. })
    }

    /// Check if this error came from the storage layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::StoreWrite { .. }
                | Self::DirectoryCreate { .. }
                | Self::UnsupportedVersion { .. }
                | Self::Io(_)
        )
    }
}
