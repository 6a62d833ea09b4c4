//! App-private image directory: copy picked images in, remove them on delete.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::util::next_timestamp_millis;
use crate::{Error, Result};

/// File name prefix of copied images.
pub const IMAGE_FILE_PREFIX: &str = "image_";
/// File extension of copied images.
pub const IMAGE_FILE_EXTENSION: &str = "jpg";

const FILE_URI_SCHEME: &str = "file://";

/// Materializes transient image references into permanent locators.
#[allow(async_fn_in_trait)]
pub trait ImageStorage {
    /// Copy the bytes behind `source` into owned storage and return the new locator.
    async fn copy_in(&self, source: &str) -> Result<String>;

    /// Delete the file behind `locator` if this storage owns it.
    ///
    /// Absent files and foreign locators are not errors.
    async fn remove(&self, locator: &str) -> Result<()>;
}

/// [`ImageStorage`] over a local directory.
#[derive(Clone, Debug)]
pub struct LocalImageStorage {
    images_dir: PathBuf,
}

impl LocalImageStorage {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Directory that receives copied images.
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    async fn ensure_dir(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|error| {
                Error::Copy(format!(
                    "Failed to create images directory {}: {error}",
                    self.images_dir.display()
                ))
            })?;
        tokio::fs::canonicalize(&self.images_dir)
            .await
            .map_err(|error| {
                Error::Copy(format!(
                    "Failed to resolve images directory {}: {error}",
                    self.images_dir.display()
                ))
            })
    }

    async fn unused_destination(dir: &Path) -> Result<PathBuf> {
        loop {
            let file_name = format!(
                "{IMAGE_FILE_PREFIX}{}.{IMAGE_FILE_EXTENSION}",
                next_timestamp_millis()
            );
            let candidate = dir.join(file_name);
            if !tokio::fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    async fn owns(&self, path: &Path) -> bool {
        let Ok(dir) = tokio::fs::canonicalize(&self.images_dir).await else {
            return false;
        };
        let Some(parent) = path.parent() else {
            return false;
        };
        match tokio::fs::canonicalize(parent).await {
            Ok(parent) => parent == dir,
            Err(_) => false,
        }
    }
}

impl ImageStorage for LocalImageStorage {
    async fn copy_in(&self, source: &str) -> Result<String> {
        let source_path = source_path(source)?;
        let dir = self.ensure_dir().await?;
        let destination = Self::unused_destination(&dir)
            .await
            .map_err(|error| Error::Copy(error.user_message()))?;

        tokio::fs::copy(&source_path, &destination)
            .await
            .map_err(|error| {
                Error::Copy(format!(
                    "Failed to copy {} to {}: {error}",
                    source_path.display(),
                    destination.display()
                ))
            })?;

        tracing::debug!(
            "Copied image {} to {}",
            source_path.display(),
            destination.display()
        );
        Ok(destination.to_string_lossy().into_owned())
    }

    async fn remove(&self, locator: &str) -> Result<()> {
        let Ok(path) = source_path(locator) else {
            return Ok(());
        };
        if !self.owns(&path).await {
            tracing::debug!("Leaving image outside the images directory: {locator}");
            return Ok(());
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed image {}", path.display());
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// Resolve a plain path or `file://` URI to a filesystem path.
fn source_path(source: &str) -> Result<PathBuf> {
    let trimmed = source.trim();
    let path = trimmed.strip_prefix(FILE_URI_SCHEME).unwrap_or(trimmed);
    if path.is_empty() {
        return Err(Error::Copy("Image source is empty".to_string()));
    }
    Ok(PathBuf::from(path))
}
