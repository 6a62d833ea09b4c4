//! Shared database service wrapper used by the editor and the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::{Database, EntryStore, ImageStore, LibSqlEntryStore, LibSqlImageStore};
use crate::models::{Entry, EntryId, EntryImage, EntryImageId, NewEntry, NewEntryImage};
use crate::services::Subscription;
use crate::{Error, Result};

/// Revision counters bumped after every committed write.
#[derive(Debug)]
struct ChangeFeed {
    entries: watch::Sender<u64>,
    images: watch::Sender<u64>,
}

impl ChangeFeed {
    fn new() -> Self {
        let (entries, _) = watch::channel(0);
        let (images, _) = watch::channel(0);
        Self { entries, images }
    }

    fn entries_changed(&self) {
        self.entries.send_modify(|revision| *revision += 1);
    }

    fn images_changed(&self) {
        self.images.send_modify(|revision| *revision += 1);
    }
}

/// Thread-safe service for DB and store operations.
///
/// Cloning is cheap; all clones share one connection and one change feed, so
/// subscriptions see writes made through any clone.
#[derive(Clone)]
pub struct DatabaseService {
    db: Arc<Mutex<Database>>,
    changes: Arc<ChangeFeed>,
    db_path: Option<PathBuf>,
}

impl DatabaseService {
    /// Open a database service at the given filesystem path.
    pub async fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::open(&db_path).await?;
        tracing::info!("Opened diary database at {}", db_path.display());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(ChangeFeed::new()),
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory database service (primarily for tests).
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            changes: Arc::new(ChangeFeed::new()),
            db_path: None,
        })
    }

    /// Path of the backing database file, `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&std::path::Path> {
        self.db_path.as_deref()
    }

    /// List entries newest-first.
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        let db = self.db.lock().await;
        LibSqlEntryStore::new(db.connection()).list().await
    }

    /// Fetch an entry by id.
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let db = self.db.lock().await;
        LibSqlEntryStore::new(db.connection()).get(id).await
    }

    /// Count stored entries.
    pub async fn count_entries(&self) -> Result<u64> {
        let db = self.db.lock().await;
        LibSqlEntryStore::new(db.connection()).count().await
    }

    /// Insert a new entry and return its id.
    pub async fn insert_entry(&self, entry: &NewEntry) -> Result<EntryId> {
        let id = {
            let db = self.db.lock().await;
            LibSqlEntryStore::new(db.connection()).insert(entry).await?
        };
        self.changes.entries_changed();
        Ok(id)
    }

    /// Replace a stored entry.
    pub async fn update_entry(&self, entry: &Entry) -> Result<()> {
        {
            let db = self.db.lock().await;
            LibSqlEntryStore::new(db.connection()).update(entry).await?;
        }
        self.changes.entries_changed();
        Ok(())
    }

    /// Delete an entry together with all of its image rows in one transaction.
    pub async fn delete_entry(&self, id: EntryId) -> Result<()> {
        {
            let db = self.db.lock().await;
            let conn = db.connection();
            conn.execute("BEGIN TRANSACTION", ())
                .await
                .map_err(|error| Error::storage(&error))?;

            let result = async {
                let removed = LibSqlImageStore::new(conn).delete_all_for_entry(id).await?;
                LibSqlEntryStore::new(conn).delete(id).await?;
                Ok::<_, Error>(removed)
            }
            .await;

            match result {
                Ok(removed) => {
                    if let Err(error) = conn.execute("COMMIT", ()).await {
                        conn.execute("ROLLBACK", ()).await.ok();
                        return Err(Error::storage(&error));
                    }
                    tracing::debug!("Deleted entry {id} and {removed} image row(s)");
                }
                Err(error) => {
                    conn.execute("ROLLBACK", ()).await.ok();
                    return Err(error);
                }
            }
        }
        self.changes.entries_changed();
        self.changes.images_changed();
        Ok(())
    }

    /// List image rows for an entry, oldest first.
    pub async fn list_images(&self, entry_id: EntryId) -> Result<Vec<EntryImage>> {
        let db = self.db.lock().await;
        LibSqlImageStore::new(db.connection())
            .list_for_entry(entry_id)
            .await
    }

    /// List image locators for an entry, oldest first.
    pub async fn image_paths_for_entry(&self, entry_id: EntryId) -> Result<Vec<String>> {
        let db = self.db.lock().await;
        LibSqlImageStore::new(db.connection())
            .paths_for_entry(entry_id)
            .await
    }

    /// Attach an image row to an entry.
    pub async fn insert_image(&self, image: &NewEntryImage) -> Result<EntryImageId> {
        let id = {
            let db = self.db.lock().await;
            LibSqlImageStore::new(db.connection()).insert(image).await?
        };
        self.changes.images_changed();
        Ok(id)
    }

    /// Remove image rows matching a locator exactly.
    pub async fn delete_image_by_path(&self, image_path: &str) -> Result<u64> {
        let removed = {
            let db = self.db.lock().await;
            LibSqlImageStore::new(db.connection())
                .delete_by_path(image_path)
                .await?
        };
        if removed > 0 {
            self.changes.images_changed();
        }
        Ok(removed)
    }

    /// Remove every image row of an entry.
    pub async fn delete_images_for_entry(&self, entry_id: EntryId) -> Result<u64> {
        let removed = {
            let db = self.db.lock().await;
            LibSqlImageStore::new(db.connection())
                .delete_all_for_entry(entry_id)
                .await?
        };
        if removed > 0 {
            self.changes.images_changed();
        }
        Ok(removed)
    }

    /// Subscribe to all entries, newest first.
    pub async fn subscribe_entries(&self) -> Result<Subscription<Vec<Entry>>> {
        let service = self.clone();
        Subscription::spawn(self.changes.entries.subscribe(), move || {
            let service = service.clone();
            async move { service.list_entries().await }
        })
        .await
    }

    /// Subscribe to the image locators of one entry, oldest first.
    pub async fn subscribe_image_paths(
        &self,
        entry_id: EntryId,
    ) -> Result<Subscription<Vec<String>>> {
        let service = self.clone();
        Subscription::spawn(self.changes.images.subscribe(), move || {
            let service = service.clone();
            async move { service.image_paths_for_entry(entry_id).await }
        })
        .await
    }
}
