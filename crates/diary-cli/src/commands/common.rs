use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use diary_core::config::DiaryConfig;
use diary_core::editor::EntryEditor;
use diary_core::models::EntryImage;
use diary_core::services::{
    DatabaseService, EntryRepository, LocalEntryRepository, LocalImageRepository,
};
use diary_core::storage::LocalImageStorage;
use diary_core::toast::ToastChannel;
use diary_core::{Entry, EntryId};
use serde::Serialize;

use crate::error::CliError;

/// Editor wired to the local database and images directory.
pub type Editor = EntryEditor<LocalEntryRepository, LocalImageRepository, LocalImageStorage>;

#[derive(Debug, Serialize)]
pub struct EntryListItem {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub date: i64,
    pub display_date: String,
}

#[derive(Debug, Serialize)]
pub struct EntryDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: i64,
    pub display_date: String,
    pub images: Vec<ImageItem>,
}

#[derive(Debug, Serialize)]
pub struct ImageItem {
    pub id: i64,
    pub path: String,
    pub timestamp: i64,
}

/// Load the config file and environment, then apply command-line overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    db_path: Option<PathBuf>,
    images_dir: Option<PathBuf>,
) -> Result<DiaryConfig, CliError> {
    let config = DiaryConfig::load(config_path)?;
    Ok(apply_cli_overrides(config, db_path, images_dir))
}

pub fn apply_cli_overrides(
    mut config: DiaryConfig,
    db_path: Option<PathBuf>,
    images_dir: Option<PathBuf>,
) -> DiaryConfig {
    if db_path.is_some() {
        config.db_path = db_path;
    }
    if images_dir.is_some() {
        config.images_dir = images_dir;
    }
    config
}

pub async fn open_editor(config: &DiaryConfig) -> Result<Editor, CliError> {
    let db_path = config.resolved_db_path()?;
    let images_dir = config.resolved_images_dir()?;
    let db = DatabaseService::open_path(db_path).await?;
    tracing::debug!("Using images directory {}", images_dir.display());

    Ok(EntryEditor::new(
        db.entry_repository(),
        db.image_repository(),
        LocalImageStorage::new(images_dir),
        ToastChannel::new(config.toast_duration()),
    )
    .with_max_images(config.max_images_per_entry))
}

pub fn parse_entry_id(id: &str) -> Result<EntryId, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyEntryId);
    }
    trimmed
        .parse::<EntryId>()
        .map_err(|_| CliError::InvalidEntryId(trimmed.to_string()))
}

pub async fn resolve_entry(editor: &Editor, id: &str) -> Result<Entry, CliError> {
    let id = parse_entry_id(id)?;
    editor
        .entries()
        .get_by_id(id)
        .await?
        .ok_or(CliError::EntryNotFound(id))
}

pub fn normalize_title(title: &str) -> Result<String, CliError> {
    normalize_content(title).ok_or(CliError::EmptyTitle)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Content from the flag, else piped stdin, else empty.
pub fn resolve_entry_content(content: Option<String>) -> Result<String, CliError> {
    if let Some(content) = content {
        return Ok(content.trim().to_string());
    }
    Ok(read_piped_stdin()?.unwrap_or_default())
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Find an attached image by exact locator or by file name.
pub fn match_image_locator(images: &[String], query: &str) -> Option<String> {
    let query = query.trim();
    if let Some(exact) = images.iter().find(|locator| locator.as_str() == query) {
        return Some(exact.clone());
    }
    images
        .iter()
        .find(|locator| {
            Path::new(locator.as_str())
                .file_name()
                .is_some_and(|name| name == query)
        })
        .cloned()
}

pub fn format_entry_lines(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let title = truncate(&entry.title, 30);
            let preview = entry.content_preview(40);
            format!(
                "{:>5}  {:<11}  {title:<30}  {preview}",
                entry.id.as_i64(),
                entry.display_date()
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

pub fn entry_to_list_item(entry: &Entry) -> EntryListItem {
    EntryListItem {
        id: entry.id.as_i64(),
        title: entry.title.clone(),
        preview: entry.content_preview(80),
        date: entry.date,
        display_date: entry.display_date(),
    }
}

pub fn entry_to_detail(entry: &Entry, images: &[EntryImage]) -> EntryDetail {
    EntryDetail {
        id: entry.id.as_i64(),
        title: entry.title.clone(),
        content: entry.content.clone(),
        date: entry.date,
        display_date: entry.display_date(),
        images: images
            .iter()
            .map(|image| ImageItem {
                id: image.id.as_i64(),
                path: image.image_path.clone(),
                timestamp: image.timestamp,
            })
            .collect(),
    }
}

pub fn format_entry_detail(detail: &EntryDetail) -> Vec<String> {
    let mut lines = vec![
        format!("#{}  {}", detail.id, detail.display_date),
        detail.title.clone(),
    ];
    if !detail.content.is_empty() {
        lines.push(String::new());
        lines.extend(detail.content.lines().map(ToString::to_string));
    }
    if !detail.images.is_empty() {
        lines.push(String::new());
        lines.push(format!("Images ({}):", detail.images.len()));
        lines.extend(detail.images.iter().map(|image| format!("  {}", image.path)));
    }
    lines
}

/// Print the editor's pending notification to stderr.
pub fn print_toast(toasts: &ToastChannel) {
    if let Some(toast) = toasts.current() {
        eprintln!("[{}] {}", toast.kind, toast.message);
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated = text
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
