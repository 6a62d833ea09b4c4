use std::path::{Path, PathBuf};

use clap::Parser;
use diary_core::config::DiaryConfig;
use diary_core::services::{EntryRepository, ImageRepository};
use diary_core::{Entry, EntryId};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::{
    apply_cli_overrides, format_entry_lines, match_image_locator, normalize_content,
    normalize_title, open_editor, parse_entry_id, Editor,
};
use crate::commands::delete::run_delete;
use crate::commands::edit::{run_edit, EditRequest};
use crate::error::CliError;

#[test]
fn normalize_content_trims_and_rejects_empty() {
    assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_content(" \n\t "), None);
}

#[test]
fn normalize_title_rejects_blank() {
    assert_eq!(normalize_title(" Day one ").unwrap(), "Day one");
    assert!(matches!(normalize_title("   "), Err(CliError::EmptyTitle)));
}

#[test]
fn parse_entry_id_validates_input() {
    assert_eq!(parse_entry_id(" 12 ").unwrap(), EntryId::new(12));
    assert!(matches!(parse_entry_id(""), Err(CliError::EmptyEntryId)));
    assert!(matches!(
        parse_entry_id("abc"),
        Err(CliError::InvalidEntryId(value)) if value == "abc"
    ));
}

#[test]
fn add_command_collects_repeated_images() {
    let cli = Cli::try_parse_from([
        "diary", "add", "--title", "Trip", "--image", "a.jpg", "-i", "b.jpg",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Add {
            title,
            content,
            images,
        }) => {
            assert_eq!(title, "Trip");
            assert_eq!(content, None);
            assert_eq!(images, vec!["a.jpg", "b.jpg"]);
        }
        _ => panic!("expected add command"),
    }
}

#[test]
fn global_flags_apply_after_subcommand() {
    let cli = Cli::try_parse_from([
        "diary",
        "list",
        "--json",
        "--db-path",
        "/tmp/d.db",
        "--images-dir",
        "/tmp/img",
    ])
    .unwrap();

    assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/d.db")));
    assert_eq!(cli.images_dir, Some(PathBuf::from("/tmp/img")));
    assert!(matches!(
        cli.command,
        Some(Commands::List {
            limit: None,
            json: true
        })
    ));
}

#[test]
fn edit_command_parses_image_changes() {
    let cli = Cli::try_parse_from([
        "diary",
        "edit",
        "3",
        "--add-image",
        "new.jpg",
        "--remove-image",
        "image_1.jpg",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Edit {
            id,
            title,
            add_images,
            remove_images,
            ..
        }) => {
            assert_eq!(id, "3");
            assert_eq!(title, None);
            assert_eq!(add_images, vec!["new.jpg"]);
            assert_eq!(remove_images, vec!["image_1.jpg"]);
        }
        _ => panic!("expected edit command"),
    }
}

#[test]
fn cli_overrides_win_over_config() {
    let config = DiaryConfig {
        db_path: Some(PathBuf::from("/config/d.db")),
        images_dir: Some(PathBuf::from("/config/images")),
        ..DiaryConfig::default()
    };

    let config = apply_cli_overrides(config, Some(PathBuf::from("/flag/d.db")), None);
    assert_eq!(config.db_path, Some(PathBuf::from("/flag/d.db")));
    assert_eq!(config.images_dir, Some(PathBuf::from("/config/images")));
}

#[test]
fn match_image_locator_accepts_file_name() {
    let images = vec![
        "/data/images/image_100.jpg".to_string(),
        "/data/images/image_200.jpg".to_string(),
    ];

    assert_eq!(
        match_image_locator(&images, "/data/images/image_200.jpg").as_deref(),
        Some("/data/images/image_200.jpg")
    );
    assert_eq!(
        match_image_locator(&images, "image_100.jpg").as_deref(),
        Some("/data/images/image_100.jpg")
    );
    assert_eq!(match_image_locator(&images, "image_300.jpg"), None);
}

#[test]
fn format_entry_lines_show_id_date_and_title() {
    let entry = Entry {
        id: EntryId::new(7),
        title: "Beach day".to_string(),
        content: "Sunny\nand warm".to_string(),
        date: 1_678_890_600_000,
    };

    let lines = format_entry_lines(&[entry]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("    7  15 Mar 2023"));
    assert!(lines[0].contains("Beach day"));
    assert!(lines[0].ends_with("Sunny"));
}

struct Workspace {
    temp: TempDir,
    editor: Editor,
}

impl Workspace {
    async fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let config = DiaryConfig {
            db_path: Some(temp.path().join("diary.db")),
            images_dir: Some(temp.path().join("images")),
            ..DiaryConfig::default()
        };
        let editor = open_editor(&config).await.unwrap();
        Self { temp, editor }
    }

    fn picture(&self, name: &str) -> String {
        let path = self.temp.path().join(name);
        std::fs::write(&path, name.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn images_dir(&self) -> PathBuf {
        self.temp.path().join("images")
    }

    async fn only_entry(&self) -> Entry {
        let mut entries = self.editor.entries().load_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        entries.remove(0)
    }
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_add_saves_entry_and_copies_images() {
    let workspace = Workspace::new().await;
    let picture = workspace.picture("beach.png");

    run_add(
        "Beach",
        Some("Sunny".to_string()),
        &[picture.clone()],
        &workspace.editor,
    )
    .await
    .unwrap();

    let entry = workspace.only_entry().await;
    assert_eq!(entry.title, "Beach");
    assert_eq!(entry.content, "Sunny");

    let paths = workspace
        .editor
        .images()
        .paths_for_entry(entry.id)
        .await
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert!(Path::new(&paths[0]).starts_with(workspace.images_dir().canonicalize().unwrap()));
    assert!(Path::new(&picture).exists());
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_add_rejects_more_images_than_allowed() {
    let workspace = Workspace::new().await;
    let pictures = ["1.jpg", "2.jpg", "3.jpg", "4.jpg"]
        .into_iter()
        .map(|name| workspace.picture(name))
        .collect::<Vec<_>>();

    let error = run_add("Too many", Some(String::new()), &pictures, &workspace.editor)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        CliError::Core(diary_core::Error::InvalidInput(_))
    ));
    assert!(workspace.editor.entries().load_all().await.unwrap().is_empty());
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_edit_replaces_image_and_keeps_date() {
    let workspace = Workspace::new().await;
    let first = workspace.picture("first.jpg");
    run_add("Day", Some("Body".to_string()), &[first], &workspace.editor)
        .await
        .unwrap();
    let entry = workspace.only_entry().await;
    let old_paths = workspace
        .editor
        .images()
        .paths_for_entry(entry.id)
        .await
        .unwrap();
    let old_name = Path::new(&old_paths[0])
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();

    let request = EditRequest {
        title: Some("Day, revised".to_string()),
        add_images: vec![workspace.picture("second.jpg")],
        remove_images: vec![old_name],
        ..EditRequest::default()
    };
    run_edit(&entry.id.to_string(), request, &workspace.editor)
        .await
        .unwrap();

    let edited = workspace.only_entry().await;
    assert_eq!(edited.title, "Day, revised");
    assert_eq!(edited.content, "Body");
    assert_eq!(edited.date, entry.date);

    let new_paths = workspace
        .editor
        .images()
        .paths_for_entry(entry.id)
        .await
        .unwrap();
    assert_eq!(new_paths.len(), 1);
    assert_ne!(new_paths[0], old_paths[0]);
    assert!(!Path::new(&old_paths[0]).exists());
    assert_eq!(file_count(&workspace.images_dir()), 1);
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_edit_rejects_unknown_image() {
    let workspace = Workspace::new().await;
    run_add("Day", Some(String::new()), &[], &workspace.editor)
        .await
        .unwrap();
    let entry = workspace.only_entry().await;

    let request = EditRequest {
        remove_images: vec!["image_1.jpg".to_string()],
        ..EditRequest::default()
    };
    let error = run_edit(&entry.id.to_string(), request, &workspace.editor)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::ImageNotFound(id, _) if id == entry.id));
}

#[cfg_attr(windows, ignore = "libsql integration is flaky on windows CI")]
#[tokio::test(flavor = "current_thread")]
async fn run_delete_removes_entry_and_files() {
    let workspace = Workspace::new().await;
    let picture = workspace.picture("gone.jpg");
    run_add("Gone", Some(String::new()), &[picture], &workspace.editor)
        .await
        .unwrap();
    let entry = workspace.only_entry().await;
    assert_eq!(file_count(&workspace.images_dir()), 1);

    run_delete(&entry.id.to_string(), &workspace.editor)
        .await
        .unwrap();

    assert!(workspace.editor.entries().load_all().await.unwrap().is_empty());
    assert!(workspace
        .editor
        .images()
        .paths_for_entry(entry.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(file_count(&workspace.images_dir()), 0);

    let error = run_delete(&entry.id.to_string(), &workspace.editor)
        .await
        .unwrap_err();
    assert!(matches!(error, CliError::EntryNotFound(id) if id == entry.id));
}
