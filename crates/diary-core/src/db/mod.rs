//! Database layer for Diary

mod connection;
mod entry_store;
mod image_store;
mod migrations;

pub use connection::Database;
pub use entry_store::{EntryStore, LibSqlEntryStore};
pub use image_store::{ImageStore, LibSqlImageStore};
