use crate::commands::common::{normalize_title, print_toast, resolve_entry_content, Editor};
use crate::error::CliError;

pub async fn run_add(
    title: &str,
    content: Option<String>,
    images: &[String],
    editor: &Editor,
) -> Result<(), CliError> {
    let title = normalize_title(title)?;
    let content = resolve_entry_content(content)?;

    editor.update_title(title);
    editor.update_content(content);
    editor.update_images(images)?;
    let id = editor.save().await?;

    print_toast(editor.toasts());
    println!("{id}");
    Ok(())
}
