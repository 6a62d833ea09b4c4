//! Runtime configuration for diary front-ends.
//!
//! Values resolve in this order: explicit overrides from the caller (CLI
//! flags), then `DIARY_*` environment variables, then an optional JSON config
//! file, then defaults under the platform data directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::editor::MAX_IMAGES_PER_ENTRY;
use crate::util::normalize_text_option;
use crate::{Error, Result};

pub const DB_PATH_ENV: &str = "DIARY_DB_PATH";
pub const IMAGES_DIR_ENV: &str = "DIARY_IMAGES_DIR";

const APP_DIR_NAME: &str = "diary";
const DB_FILE_NAME: &str = "diary.db";
const IMAGES_DIR_NAME: &str = "images";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_TOAST_DURATION_MS: u64 = 2_000;

/// Diary settings shared by the CLI and embedding apps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DiaryConfig {
    /// Database file; `None` falls back to the data directory.
    pub db_path: Option<PathBuf>,
    /// Directory receiving copied images; `None` falls back to the data directory.
    pub images_dir: Option<PathBuf>,
    pub toast_duration_ms: u64,
    pub max_images_per_entry: usize,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            images_dir: None,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            max_images_per_entry: MAX_IMAGES_PER_ENTRY,
        }
    }
}

impl DiaryConfig {
    /// Load configuration from `path`, or from the default config file when it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.with_env_overrides(|key| std::env::var(key).ok()).validated()
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::Config(format!("Failed to read {}: {error}", path.display()))
        })?;
        Self::from_json(&raw).map_err(|error| {
            Error::Config(format!("Invalid config {}: {}", path.display(), error.user_message()))
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply `DIARY_*` variables through `lookup`. Blank values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(db_path) = normalize_text_option(lookup(DB_PATH_ENV)) {
            self.db_path = Some(PathBuf::from(db_path));
        }
        if let Some(images_dir) = normalize_text_option(lookup(IMAGES_DIR_ENV)) {
            self.images_dir = Some(PathBuf::from(images_dir));
        }
        self
    }

    /// Reject a zero image cap and clamp larger ones to [`MAX_IMAGES_PER_ENTRY`].
    pub fn validated(mut self) -> Result<Self> {
        if self.max_images_per_entry == 0 {
            return Err(Error::Config(
                "max_images_per_entry must be at least 1".to_string(),
            ));
        }
        if self.max_images_per_entry > MAX_IMAGES_PER_ENTRY {
            tracing::warn!(
                "max_images_per_entry {} exceeds the limit, using {MAX_IMAGES_PER_ENTRY}",
                self.max_images_per_entry
            );
            self.max_images_per_entry = MAX_IMAGES_PER_ENTRY;
        }
        Ok(self)
    }

    /// Database path, falling back to `<data dir>/diary/diary.db`.
    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_data_dir()?.join(DB_FILE_NAME)),
        }
    }

    /// Images directory, falling back to a sibling of the database file.
    pub fn resolved_images_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.images_dir {
            return Ok(dir.clone());
        }
        match self.db_path.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.join(IMAGES_DIR_NAME)),
            _ => Ok(app_data_dir()?.join(IMAGES_DIR_NAME)),
        }
    }

    pub const fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

/// Default config file location, `<data dir>/diary/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn app_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| Error::Config("Could not determine a data directory".to_string()))
}
