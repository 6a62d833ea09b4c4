//! Services shared by the editor and the CLI.

mod database;
mod repository;
mod subscription;

pub use database::DatabaseService;
pub use repository::{
    EntryRepository, ImageRepository, LocalEntryRepository, LocalImageRepository,
};
pub use subscription::Subscription;
