use diary_core::services::EntryRepository;

use crate::commands::common::{entry_to_list_item, format_entry_lines, Editor, EntryListItem};
use crate::error::CliError;

pub async fn run_list(limit: Option<usize>, as_json: bool, editor: &Editor) -> Result<(), CliError> {
    let mut entries = editor.entries().load_all().await?;
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<EntryListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_entry_lines(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
