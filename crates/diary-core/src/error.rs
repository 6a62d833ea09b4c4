//! Error types for diary-core

use thiserror::Error;

/// Result type alias using diary-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in diary-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Constraint violation or missing row on a write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Image could not be materialized into the images directory
    #[error("Copy error: {0}")]
    Copy(String),

    /// Lookup miss
    #[error("Not found: {0}")]
    NotFound(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a failed libSQL write as a [`Error::Storage`].
    pub(crate) fn storage(error: &libsql::Error) -> Self {
        Self::Storage(error.to_string())
    }

    /// Message suitable for showing to the user, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(message)
            | Self::Copy(message)
            | Self::NotFound(message)
            | Self::InvalidInput(message)
            | Self::Config(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
