//! Entry store implementation

use crate::error::{Error, Result};
use crate::models::{Entry, EntryId, NewEntry};
use libsql::{params, Connection};

/// Trait for entry storage operations (async)
#[allow(async_fn_in_trait)]
pub trait EntryStore {
    /// List all entries, newest date first
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Get an entry by ID
    async fn get(&self, id: EntryId) -> Result<Option<Entry>>;

    /// Insert a new entry and return its assigned ID
    async fn insert(&self, entry: &NewEntry) -> Result<EntryId>;

    /// Replace title, content and date of an existing entry
    async fn update(&self, entry: &Entry) -> Result<()>;

    /// Delete an entry; owned images go with it
    async fn delete(&self, id: EntryId) -> Result<()>;

    /// Count stored entries
    async fn count(&self) -> Result<u64>;
}

/// libSQL implementation of `EntryStore`
pub struct LibSqlEntryStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlEntryStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse an entry from a database row
    fn parse_entry(row: &libsql::Row) -> Result<Entry> {
        Ok(Entry {
            id: EntryId::new(row.get(0)?),
            title: row.get(1)?,
            content: row.get(2)?,
            date: row.get(3)?,
        })
    }
}

impl EntryStore for LibSqlEntryStore<'_> {
    async fn list(&self) -> Result<Vec<Entry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, content, date
                 FROM entries
                 ORDER BY date DESC, id DESC",
                (),
            )
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(Self::parse_entry(&row)?);
        }
        Ok(entries)
    }

    async fn get(&self, id: EntryId) -> Result<Option<Entry>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, title, content, date FROM entries WHERE id = ?",
                params![id.as_i64()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::parse_entry(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, entry: &NewEntry) -> Result<EntryId> {
        self.conn
            .execute(
                "INSERT INTO entries (title, content, date) VALUES (?, ?, ?)",
                params![entry.title.as_str(), entry.content.as_str(), entry.date],
            )
            .await
            .map_err(|error| Error::storage(&error))?;

        let id = EntryId::new(self.conn.last_insert_rowid());
        tracing::debug!("Inserted entry {id}");
        Ok(id)
    }

    async fn update(&self, entry: &Entry) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE entries SET title = ?, content = ?, date = ? WHERE id = ?",
                params![
                    entry.title.as_str(),
                    entry.content.as_str(),
                    entry.date,
                    entry.id.as_i64()
                ],
            )
            .await
            .map_err(|error| Error::storage(&error))?;

        if rows == 0 {
            return Err(Error::Storage(format!("No entry with id {}", entry.id)));
        }

        tracing::debug!("Updated entry {}", entry.id);
        Ok(())
    }

    async fn delete(&self, id: EntryId) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?", params![id.as_i64()])
            .await
            .map_err(|error| Error::storage(&error))?;

        if rows == 0 {
            return Err(Error::NotFound(format!("Entry {id}")));
        }

        tracing::debug!("Deleted entry {id}");
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self.conn.query("SELECT COUNT(*) FROM entries", ()).await?;
        let count = match rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or_default(),
            None => 0,
        };
        Ok(count)
    }
}
