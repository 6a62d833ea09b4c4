//! Entry and image repositories exposed to the editor.

use crate::models::{Entry, EntryId, EntryImage, EntryImageId, NewEntry, NewEntryImage};
use crate::services::{DatabaseService, Subscription};
use crate::Result;

/// Entry persistence as seen by the editor.
#[allow(async_fn_in_trait)]
pub trait EntryRepository {
    /// Live list of all entries, newest date first.
    async fn get_all(&self) -> Result<Subscription<Vec<Entry>>>;

    /// One-shot snapshot of all entries, newest date first.
    async fn load_all(&self) -> Result<Vec<Entry>>;

    /// Fetch one entry; `None` when it does not exist.
    async fn get_by_id(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Store a new entry and return its assigned id.
    async fn insert(&self, entry: &NewEntry) -> Result<EntryId>;

    /// Replace a stored entry by id.
    async fn update(&self, entry: &Entry) -> Result<()>;

    /// Remove an entry and its image rows.
    async fn delete(&self, entry: &Entry) -> Result<()>;
}

/// Image attachment persistence as seen by the editor.
#[allow(async_fn_in_trait)]
pub trait ImageRepository {
    /// Live list of an entry's image locators, oldest attachment first.
    async fn get_for_entry(&self, entry_id: EntryId) -> Result<Subscription<Vec<String>>>;

    /// One-shot snapshot of an entry's image locators, oldest attachment first.
    async fn paths_for_entry(&self, entry_id: EntryId) -> Result<Vec<String>>;

    /// One-shot snapshot of an entry's full image rows, oldest attachment first.
    async fn list_for_entry(&self, entry_id: EntryId) -> Result<Vec<EntryImage>>;

    /// Attach an image row; fails when the owning entry does not exist.
    async fn insert(&self, image: &NewEntryImage) -> Result<EntryImageId>;

    /// Remove rows whose locator matches exactly; no-op when absent.
    async fn delete_by_locator(&self, locator: &str) -> Result<()>;

    /// Remove every image row of an entry.
    async fn delete_all_for_entry(&self, entry_id: EntryId) -> Result<()>;
}

/// [`EntryRepository`] backed by the local database.
#[derive(Clone)]
pub struct LocalEntryRepository {
    service: DatabaseService,
}

impl LocalEntryRepository {
    pub const fn new(service: DatabaseService) -> Self {
        Self { service }
    }
}

impl EntryRepository for LocalEntryRepository {
    async fn get_all(&self) -> Result<Subscription<Vec<Entry>>> {
        self.service.subscribe_entries().await
    }

    async fn load_all(&self) -> Result<Vec<Entry>> {
        self.service.list_entries().await
    }

    async fn get_by_id(&self, id: EntryId) -> Result<Option<Entry>> {
        self.service.get_entry(id).await
    }

    async fn insert(&self, entry: &NewEntry) -> Result<EntryId> {
        self.service.insert_entry(entry).await
    }

    async fn update(&self, entry: &Entry) -> Result<()> {
        self.service.update_entry(entry).await
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        self.service.delete_entry(entry.id).await
    }
}

/// [`ImageRepository`] backed by the local database.
#[derive(Clone)]
pub struct LocalImageRepository {
    service: DatabaseService,
}

impl LocalImageRepository {
    pub const fn new(service: DatabaseService) -> Self {
        Self { service }
    }
}

impl ImageRepository for LocalImageRepository {
    async fn get_for_entry(&self, entry_id: EntryId) -> Result<Subscription<Vec<String>>> {
        self.service.subscribe_image_paths(entry_id).await
    }

    async fn paths_for_entry(&self, entry_id: EntryId) -> Result<Vec<String>> {
        self.service.image_paths_for_entry(entry_id).await
    }

    async fn list_for_entry(&self, entry_id: EntryId) -> Result<Vec<EntryImage>> {
        self.service.list_images(entry_id).await
    }

    async fn insert(&self, image: &NewEntryImage) -> Result<EntryImageId> {
        self.service.insert_image(image).await
    }

    async fn delete_by_locator(&self, locator: &str) -> Result<()> {
        self.service.delete_image_by_path(locator).await?;
        Ok(())
    }

    async fn delete_all_for_entry(&self, entry_id: EntryId) -> Result<()> {
        self.service.delete_images_for_entry(entry_id).await?;
        Ok(())
    }
}

impl DatabaseService {
    /// Entry repository sharing this service's connection.
    pub fn entry_repository(&self) -> LocalEntryRepository {
        LocalEntryRepository::new(self.clone())
    }

    /// Image repository sharing this service's connection.
    pub fn image_repository(&self) -> LocalImageRepository {
        LocalImageRepository::new(self.clone())
    }
}
