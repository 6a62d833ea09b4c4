//! diary-core - Core library for the diary
//!
//! This crate contains the entry and image models, the database layer, image
//! file storage and the entry editor used by every diary front-end.

pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod toast;
pub mod util;

pub use error::{Error, Result};
pub use models::{Entry, EntryId};
