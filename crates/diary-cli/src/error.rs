use std::io;

use diary_core::EntryId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] diary_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Entry title cannot be empty")]
    EmptyTitle,
    #[error("Entry ID cannot be empty")]
    EmptyEntryId,
    #[error("Invalid entry ID: {0}")]
    InvalidEntryId(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),
    #[error("Entry {0} has no image matching '{1}'")]
    ImageNotFound(EntryId, String),
    #[error("Entry {0} could not be deleted")]
    DeleteFailed(EntryId),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
