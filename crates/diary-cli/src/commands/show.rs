use diary_core::services::ImageRepository;

use crate::commands::common::{entry_to_detail, format_entry_detail, resolve_entry, Editor};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, editor: &Editor) -> Result<(), CliError> {
    let entry = resolve_entry(editor, id).await?;
    let images = editor.images().list_for_entry(entry.id).await?;
    let detail = entry_to_detail(&entry, &images);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        for line in format_entry_detail(&detail) {
            println!("{line}");
        }
    }

    Ok(())
}
