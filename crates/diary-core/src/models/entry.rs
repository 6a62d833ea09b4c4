//! Entry model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::util::{format_entry_date, unix_millis_now};

/// Identifier of a persisted entry, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    /// Wrap a raw row id
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw row id
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A diary entry that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    /// Creation date (Unix ms)
    pub date: i64,
}

impl NewEntry {
    /// Create a draft entry dated now
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            date: unix_millis_now(),
        }
    }

    /// Override the creation date (Unix ms)
    #[must_use]
    pub const fn with_date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }

    /// Attach the identity assigned by the store
    #[must_use]
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            title: self.title,
            content: self.content,
            date: self.date,
        }
    }
}

/// A stored diary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identity
    pub id: EntryId,
    pub title: String,
    pub content: String,
    /// Creation date (Unix ms), never changed by updates
    pub date: i64,
}

impl Entry {
    /// Creation date rendered as `dd Mon yyyy`
    #[must_use]
    pub fn display_date(&self) -> String {
        format_entry_date(self.date)
    }

    /// First line of the content, truncated to `max_len` characters
    #[must_use]
    pub fn content_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }
}
