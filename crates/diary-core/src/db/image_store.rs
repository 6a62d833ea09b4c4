//! Entry image store implementation

use crate::error::{Error, Result};
use crate::models::{EntryId, EntryImage, EntryImageId, NewEntryImage};
use libsql::{params, Connection};

/// Trait for image attachment storage operations (async)
#[allow(async_fn_in_trait)]
pub trait ImageStore {
    /// List image rows for an entry, oldest attachment first
    async fn list_for_entry(&self, entry_id: EntryId) -> Result<Vec<EntryImage>>;

    /// List image locators for an entry, oldest attachment first
    async fn paths_for_entry(&self, entry_id: EntryId) -> Result<Vec<String>>;

    /// Insert an image row; the owning entry must exist
    async fn insert(&self, image: &NewEntryImage) -> Result<EntryImageId>;

    /// Delete rows whose locator matches exactly; returns rows removed
    async fn delete_by_path(&self, image_path: &str) -> Result<u64>;

    /// Delete every image row of an entry; returns rows removed
    async fn delete_all_for_entry(&self, entry_id: EntryId) -> Result<u64>;
}

/// libSQL implementation of `ImageStore`
pub struct LibSqlImageStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlImageStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_image(row: &libsql::Row) -> Result<EntryImage> {
        Ok(EntryImage {
            id: EntryImageId::new(row.get(0)?),
            entry_id: EntryId::new(row.get(1)?),
            image_path: row.get(2)?,
            timestamp: row.get(3)?,
        })
    }
}

impl ImageStore for LibSqlImageStore<'_> {
    async fn list_for_entry(&self, entry_id: EntryId) -> Result<Vec<EntryImage>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, entryId, imagePath, timestamp
                 FROM entry_image
                 WHERE entryId = ?
                 ORDER BY timestamp ASC, id ASC",
                params![entry_id.as_i64()],
            )
            .await?;

        let mut images = Vec::new();
        while let Some(row) = rows.next().await? {
            images.push(Self::parse_image(&row)?);
        }
        Ok(images)
    }

    async fn paths_for_entry(&self, entry_id: EntryId) -> Result<Vec<String>> {
        let images = self.list_for_entry(entry_id).await?;
        Ok(images.into_iter().map(|image| image.image_path).collect())
    }

    async fn insert(&self, image: &NewEntryImage) -> Result<EntryImageId> {
        self.conn
            .execute(
                "INSERT INTO entry_image (entryId, imagePath, timestamp) VALUES (?, ?, ?)",
                params![
                    image.entry_id.as_i64(),
                    image.image_path.as_str(),
                    image.timestamp
                ],
            )
            .await
            .map_err(|error| {
                Error::Storage(format!(
                    "Failed to attach image to entry {}: {error}",
                    image.entry_id
                ))
            })?;

        let id = EntryImageId::new(self.conn.last_insert_rowid());
        tracing::debug!("Attached image {} to entry {}", id, image.entry_id);
        Ok(id)
    }

    async fn delete_by_path(&self, image_path: &str) -> Result<u64> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM entry_image WHERE imagePath = ?",
                params![image_path],
            )
            .await
            .map_err(|error| Error::storage(&error))?;
        Ok(rows)
    }

    async fn delete_all_for_entry(&self, entry_id: EntryId) -> Result<u64> {
        let rows = self
            .conn
            .execute(
                "DELETE FROM entry_image WHERE entryId = ?",
                params![entry_id.as_i64()],
            )
            .await
            .map_err(|error| Error::storage(&error))?;
        Ok(rows)
    }
}
