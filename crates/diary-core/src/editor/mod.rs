//! Entry editor: the single writer behind the entry screens.
//!
//! [`EntryEditor`] owns the draft (title, content, date and the working image
//! list), publishes it through `watch` channels, and turns save, update and
//! delete requests into repository and image storage calls. Entry-level
//! failures land in [`DraftState::error`]; image-level failures are logged and
//! skipped so one unreadable picture never loses the entry itself.

mod draft;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

pub use draft::{dedupe_locators, image_delta, DraftState, EditorStatus, ImageDelta};

use crate::models::{Entry, EntryId, NewEntryImage};
use crate::services::{EntryRepository, ImageRepository, Subscription};
use crate::storage::ImageStorage;
use crate::toast::ToastChannel;
use crate::util::unix_millis_now;
use crate::{Error, Result};

/// Most images a draft may hold.
pub const MAX_IMAGES_PER_ENTRY: usize = 3;

pub const ENTRY_ADDED_MESSAGE: &str = "Successfully added entry";
pub const ENTRY_EDITED_MESSAGE: &str = "Entry was edited successfully";
pub const ENTRY_DELETED_MESSAGE: &str = "Successfully deleted";
pub const ENTRY_DELETE_FAILED_MESSAGE: &str = "There was an error deleting the entry!";

/// Draft owner and write coordinator for one entry screen.
pub struct EntryEditor<E, I, S> {
    entries: E,
    images: I,
    storage: S,
    toasts: ToastChannel,
    max_images: usize,
    state: watch::Sender<DraftState>,
    working: watch::Sender<Vec<String>>,
    original: Mutex<Vec<String>>,
    persisted: Mutex<Option<Subscription<Vec<String>>>>,
}

impl<E, I, S> EntryEditor<E, I, S>
where
    E: EntryRepository,
    I: ImageRepository,
    S: ImageStorage,
{
    pub fn new(entries: E, images: I, storage: S, toasts: ToastChannel) -> Self {
        let (state, _) = watch::channel(DraftState::default());
        let (working, _) = watch::channel(Vec::new());
        Self {
            entries,
            images,
            storage,
            toasts,
            max_images: MAX_IMAGES_PER_ENTRY,
            state,
            working,
            original: Mutex::new(Vec::new()),
            persisted: Mutex::new(None),
        }
    }

    /// Lower the per-entry image cap. Values above [`MAX_IMAGES_PER_ENTRY`] are clamped.
    #[must_use]
    pub const fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = if max_images < MAX_IMAGES_PER_ENTRY {
            max_images
        } else {
            MAX_IMAGES_PER_ENTRY
        };
        self
    }

    pub const fn entries(&self) -> &E {
        &self.entries
    }

    pub const fn images(&self) -> &I {
        &self.images
    }

    pub const fn toasts(&self) -> &ToastChannel {
        &self.toasts
    }

    pub const fn max_images(&self) -> usize {
        self.max_images
    }

    /// Snapshot of the draft.
    pub fn state(&self) -> DraftState {
        self.state.borrow().clone()
    }

    /// Snapshot of the working image list.
    pub fn working_images(&self) -> Vec<String> {
        self.working.borrow().clone()
    }

    /// Image locators captured when the current entry was loaded or last written.
    pub fn original_images(&self) -> Vec<String> {
        lock(&self.original).clone()
    }

    /// Live persisted image list of the loaded entry, if one is loaded.
    pub fn persisted_images(&self) -> Option<Vec<String>> {
        lock(&self.persisted).as_ref().map(Subscription::current)
    }

    pub fn subscribe_state(&self) -> watch::Receiver<DraftState> {
        self.state.subscribe()
    }

    pub fn subscribe_images(&self) -> watch::Receiver<Vec<String>> {
        self.working.subscribe()
    }

    /// Seed the draft from an existing entry and snapshot its images.
    pub async fn load_for_edit(&self, entry: &Entry) -> Result<()> {
        let subscription = self.images.get_for_entry(entry.id).await?;
        let snapshot = subscription.current();

        self.state.send_replace(DraftState::from_entry(entry));
        *lock(&self.original) = snapshot.clone();
        self.working.send_replace(snapshot);
        if let Some(previous) = lock(&self.persisted).replace(subscription) {
            previous.unsubscribe();
        }

        tracing::debug!("Loaded entry {} for editing", entry.id);
        Ok(())
    }

    /// Start over with an empty draft.
    pub fn reset(&self) {
        self.state.send_replace(DraftState::default());
        lock(&self.original).clear();
        self.working.send_replace(Vec::new());
        if let Some(previous) = lock(&self.persisted).take() {
            previous.unsubscribe();
        }
    }

    pub fn update_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_modify(|draft| {
            draft.title = title;
            draft.clear_error();
        });
    }

    pub fn update_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.state.send_modify(|draft| {
            draft.content = content;
            draft.clear_error();
        });
    }

    /// Replace the working image list.
    ///
    /// Duplicates collapse. A list that would grow the draft past the image cap
    /// is rejected and the draft keeps its current images.
    pub fn update_images<L, T>(&self, locators: L) -> Result<()>
    where
        L: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let next = dedupe_locators(locators);
        let current_len = self.working.borrow().len();
        if next.len() > self.max_images && next.len() > current_len {
            return Err(Error::InvalidInput(format!(
                "An entry can hold at most {} images",
                self.max_images
            )));
        }

        self.working.send_if_modified(|working| {
            if *working == next {
                false
            } else {
                *working = next;
                true
            }
        });
        self.state.send_if_modified(DraftState::clear_error);
        Ok(())
    }

    /// Append one image to the working list; already-present locators are a no-op.
    pub fn add_image(&self, locator: &str) -> Result<()> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(Error::InvalidInput("Image locator is empty".to_string()));
        }

        let mut next = self.working_images();
        if next.iter().any(|existing| existing == locator) {
            return Ok(());
        }
        next.push(locator.to_string());
        self.update_images(next)
    }

    /// Drop one image from the working list. Returns whether it was present.
    pub fn remove_image(&self, locator: &str) -> Result<bool> {
        let locator = locator.trim();
        let current = self.working_images();
        let next: Vec<String> = current
            .iter()
            .filter(|existing| existing.as_str() != locator)
            .cloned()
            .collect();
        let removed = next.len() != current.len();
        self.update_images(next)?;
        Ok(removed)
    }

    /// Leave the `Success` status once the caller has acted on it.
    pub fn acknowledge(&self) {
        self.state.send_if_modified(|draft| {
            if draft.status == EditorStatus::Success {
                draft.status = EditorStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Dismiss a pending error without changing the draft.
    pub fn clear_error(&self) {
        self.state.send_if_modified(DraftState::clear_error);
    }

    /// Insert the draft as a new entry and attach its working images.
    ///
    /// A draft that is not tied to a stored entry is dated when the save starts.
    pub async fn save(&self) -> Result<EntryId> {
        self.begin_write()?;
        self.state.send_modify(|state| {
            if state.entry_id.is_none() {
                state.date = unix_millis_now();
            }
        });
        let draft = self.state();

        let id = match self.entries.insert(&draft.to_new_entry()).await {
            Ok(id) => id,
            Err(error) => return Err(self.fail_write("save", error)),
        };

        let original = self.original_images();
        let working = self.working_images();
        let delta = image_delta(&original, &working);
        let mut attached = 0_usize;
        for source in &delta.added {
            if self.attach_image(id, source).await {
                attached += 1;
            }
        }

        self.refresh_images(id, &original).await;
        self.state.send_modify(|state| {
            state.entry_id = Some(id);
            state.is_loading = false;
            state.status = EditorStatus::Success;
        });
        self.toasts.success(ENTRY_ADDED_MESSAGE);
        tracing::info!("Saved entry {id} with {attached} image(s)");
        Ok(id)
    }

    /// Write the draft's title and content onto `entry` and apply the image delta.
    ///
    /// The entry keeps its original date. When an entry is loaded, `entry` must be
    /// that entry; the image delta belongs to it.
    pub async fn update(&self, entry: &Entry) -> Result<Entry> {
        let loaded = self.state.borrow().entry_id;
        if loaded.is_some_and(|id| id != entry.id) {
            return Err(Error::InvalidInput(format!(
                "Entry {} is not the entry being edited",
                entry.id
            )));
        }
        self.begin_write()?;
        let draft = self.state();
        let updated = Entry {
            id: entry.id,
            title: draft.title,
            content: draft.content,
            date: entry.date,
        };

        if let Err(error) = self.entries.update(&updated).await {
            return Err(self.fail_write("update", error));
        }

        let original = self.original_images();
        let working = self.working_images();
        let delta = image_delta(&original, &working);
        for source in &delta.added {
            self.attach_image(updated.id, source).await;
        }
        for locator in &delta.removed {
            self.detach_image(locator).await;
        }

        let kept: Vec<String> = original
            .into_iter()
            .filter(|locator| !delta.removed.contains(locator))
            .collect();
        self.refresh_images(updated.id, &kept).await;
        self.state.send_modify(|state| {
            state.entry_id = Some(updated.id);
            state.is_loading = false;
            state.status = EditorStatus::Success;
        });
        self.toasts.info(ENTRY_EDITED_MESSAGE);
        tracing::info!(
            "Updated entry {} (+{} / -{} images)",
            updated.id,
            delta.added.len(),
            delta.removed.len()
        );
        Ok(updated)
    }

    /// Delete an entry, its image rows and, best effort, their files.
    ///
    /// The outcome goes to the toast channel; returns whether the entry was removed.
    pub async fn delete(&self, entry: &Entry) -> bool {
        let locators = match self.images.paths_for_entry(entry.id).await {
            Ok(locators) => locators,
            Err(error) => {
                tracing::warn!("Failed to list images of entry {}: {error}", entry.id);
                Vec::new()
            }
        };

        if let Err(error) = self.entries.delete(entry).await {
            tracing::error!("Failed to delete entry {}: {error}", entry.id);
            self.toasts.error(ENTRY_DELETE_FAILED_MESSAGE);
            return false;
        }

        for locator in &locators {
            if let Err(error) = self.storage.remove(locator).await {
                tracing::warn!("Failed to remove image file {locator}: {error}");
            }
        }

        if self.state.borrow().entry_id == Some(entry.id) {
            self.reset();
        }
        self.toasts.success(ENTRY_DELETED_MESSAGE);
        tracing::info!("Deleted entry {} with {} image(s)", entry.id, locators.len());
        true
    }

    fn begin_write(&self) -> Result<()> {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error = None;
            state.status = EditorStatus::Loading;
            started = true;
            true
        });

        if started {
            Ok(())
        } else {
            Err(Error::InvalidInput(
                "A save is already in progress".to_string(),
            ))
        }
    }

    fn fail_write(&self, action: &str, error: Error) -> Error {
        tracing::error!("Failed to {action} entry: {error}");
        let message = error.user_message();
        self.state.send_modify(|state| {
            state.is_loading = false;
            state.error = Some(message);
            state.status = EditorStatus::Error;
        });
        error
    }

    /// Copy one picked image into storage and record it. Failures are logged.
    async fn attach_image(&self, entry_id: EntryId, source: &str) -> bool {
        let locator = match self.storage.copy_in(source).await {
            Ok(locator) => locator,
            Err(error) => {
                tracing::warn!("Skipping image {source}: {error}");
                return false;
            }
        };

        let inserted = match NewEntryImage::new(entry_id, locator.as_str()) {
            Ok(image) => self.images.insert(&image).await.map(|_| ()),
            Err(error) => Err(error),
        };
        if let Err(error) = inserted {
            tracing::warn!("Failed to attach image {locator} to entry {entry_id}: {error}");
            if let Err(error) = self.storage.remove(&locator).await {
                tracing::warn!("Failed to clean up copied image {locator}: {error}");
            }
            return false;
        }

        true
    }

    async fn detach_image(&self, locator: &str) {
        if let Err(error) = self.images.delete_by_locator(locator).await {
            tracing::warn!("Failed to delete image row {locator}: {error}");
            return;
        }
        if let Err(error) = self.storage.remove(locator).await {
            tracing::warn!("Failed to remove image file {locator}: {error}");
        }
    }

    /// Re-snapshot persisted images after a write; `fallback` is used if the read fails.
    async fn refresh_images(&self, entry_id: EntryId, fallback: &[String]) {
        let snapshot = match self.images.paths_for_entry(entry_id).await {
            Ok(paths) => paths,
            Err(error) => {
                tracing::warn!("Failed to reload images of entry {entry_id}: {error}");
                fallback.to_vec()
            }
        };
        *lock(&self.original) = snapshot.clone();
        self.working.send_replace(snapshot);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
