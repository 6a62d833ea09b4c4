//! Storage abstractions for image files owned by the diary.

mod images;

pub use images::{ImageStorage, LocalImageStorage, IMAGE_FILE_EXTENSION, IMAGE_FILE_PREFIX};
