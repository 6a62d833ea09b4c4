//! Entry image model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::util::next_timestamp_millis;

use super::entry::EntryId;

/// Identifier of a stored image attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryImageId(i64);

impl EntryImageId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image attachment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntryImage {
    /// Owning entry.
    pub entry_id: EntryId,
    /// Storage locator (absolute path or content locator).
    pub image_path: String,
    /// Attachment timestamp (Unix ms), strictly increasing within the process.
    pub timestamp: i64,
}

impl NewEntryImage {
    /// Create an attachment record stamped with the next attachment timestamp.
    pub fn new(entry_id: EntryId, image_path: impl Into<String>) -> Result<Self> {
        let image_path = image_path.into().trim().to_string();
        if image_path.is_empty() {
            return Err(Error::InvalidInput(
                "Image locator cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            entry_id,
            image_path,
            timestamp: next_timestamp_millis(),
        })
    }
}

/// Image attachment metadata persisted for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryImage {
    pub id: EntryImageId,
    pub entry_id: EntryId,
    pub image_path: String,
    pub timestamp: i64,
}
