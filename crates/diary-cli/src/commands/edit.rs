use crate::commands::common::{match_image_locator, normalize_title, print_toast, resolve_entry, Editor};
use crate::error::CliError;

/// Changes requested by `diary edit`.
#[derive(Debug, Default)]
pub struct EditRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub add_images: Vec<String>,
    pub remove_images: Vec<String>,
}

pub async fn run_edit(id: &str, request: EditRequest, editor: &Editor) -> Result<(), CliError> {
    let entry = resolve_entry(editor, id).await?;
    editor.load_for_edit(&entry).await?;

    if let Some(title) = request.title {
        editor.update_title(normalize_title(&title)?);
    }
    if let Some(content) = request.content {
        editor.update_content(content.trim());
    }

    // Removals first so a replacement fits under the image cap
    for query in &request.remove_images {
        let Some(locator) = match_image_locator(&editor.working_images(), query) else {
            return Err(CliError::ImageNotFound(entry.id, query.clone()));
        };
        editor.remove_image(&locator)?;
    }
    for image in &request.add_images {
        editor.add_image(image)?;
    }

    let updated = editor.update(&entry).await?;
    print_toast(editor.toasts());
    println!("{}", updated.id);
    Ok(())
}
