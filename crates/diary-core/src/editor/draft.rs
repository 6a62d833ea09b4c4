//! Editable draft state and image diffing.

use serde::{Deserialize, Serialize};

use crate::models::{Entry, EntryId, NewEntry};
use crate::util::unix_millis_now;

/// Lifecycle of the editor's last write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Screen state owned by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    /// Entry being edited; `None` for a new draft.
    pub entry_id: Option<EntryId>,
    pub title: String,
    pub content: String,
    /// Unix milliseconds.
    pub date: i64,
    pub is_loading: bool,
    /// Message of the last entry-level failure.
    pub error: Option<String>,
    pub status: EditorStatus,
}

impl Default for DraftState {
    fn default() -> Self {
        Self {
            entry_id: None,
            title: String::new(),
            content: String::new(),
            date: unix_millis_now(),
            is_loading: false,
            error: None,
            status: EditorStatus::Idle,
        }
    }
}

impl DraftState {
    /// Seed a draft from a stored entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            entry_id: Some(entry.id),
            title: entry.title.clone(),
            content: entry.content.clone(),
            date: entry.date,
            ..Self::default()
        }
    }

    pub fn to_new_entry(&self) -> NewEntry {
        NewEntry::new(self.title.clone(), self.content.clone()).with_date(self.date)
    }

    /// Drop a pending error so the next write starts clean.
    pub(crate) fn clear_error(&mut self) -> bool {
        if self.error.is_none() && self.status != EditorStatus::Error {
            return false;
        }
        self.error = None;
        if self.status == EditorStatus::Error {
            self.status = EditorStatus::Idle;
        }
        true
    }
}

/// Difference between persisted and working image lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDelta {
    /// In the working list only; to be copied and inserted.
    pub added: Vec<String>,
    /// In the persisted list only; to be deleted.
    pub removed: Vec<String>,
}

impl ImageDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diff `working` against `original`, keeping each list's order.
pub fn image_delta(original: &[String], working: &[String]) -> ImageDelta {
    let added = working
        .iter()
        .filter(|locator| !original.contains(locator))
        .cloned()
        .collect();
    let removed = original
        .iter()
        .filter(|locator| !working.contains(locator))
        .cloned()
        .collect();
    ImageDelta { added, removed }
}

/// Trim locators, drop empty ones, and collapse duplicates keeping the first.
pub fn dedupe_locators<I, S>(locators: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for locator in locators {
        let locator = locator.as_ref().trim();
        if !locator.is_empty() && !unique.iter().any(|existing| existing == locator) {
            unique.push(locator.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn delta_splits_added_and_removed() {
        let delta = image_delta(&strings(&["A", "B"]), &strings(&["B", "C"]));
        assert_eq!(delta.added, strings(&["C"]));
        assert_eq!(delta.removed, strings(&["A"]));
    }

    #[test]
    fn delta_of_identical_lists_is_empty() {
        let images = strings(&["A", "B"]);
        assert!(image_delta(&images, &images).is_empty());
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        assert_eq!(
            dedupe_locators(["b", " a ", "b", "", "a"]),
            strings(&["b", "a"])
        );
    }

    #[test]
    fn clear_error_resets_error_status() {
        let mut draft = DraftState {
            error: Some("boom".to_string()),
            status: EditorStatus::Error,
            ..DraftState::default()
        };
        assert!(draft.clear_error());
        assert_eq!(draft.status, EditorStatus::Idle);
        assert_eq!(draft.error, None);
        assert!(!draft.clear_error());
    }

    #[test]
    fn from_entry_copies_fields() {
        let entry = NewEntry::new("T", "C")
            .with_date(42)
            .into_entry(EntryId::new(7));
        let draft = DraftState::from_entry(&entry);
        assert_eq!(draft.entry_id, Some(EntryId::new(7)));
        assert_eq!(draft.title, "T");
        assert_eq!(draft.date, 42);
        assert_eq!(draft.to_new_entry().content, "C");
    }
}
