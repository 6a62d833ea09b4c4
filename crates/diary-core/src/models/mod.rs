//! Data models for Diary

mod entry;
mod entry_image;

pub use entry::{Entry, EntryId, NewEntry};
pub use entry_image::{EntryImage, EntryImageId, NewEntryImage};
