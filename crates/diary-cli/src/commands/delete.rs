use crate::commands::common::{print_toast, resolve_entry, Editor};
use crate::error::CliError;

pub async fn run_delete(id: &str, editor: &Editor) -> Result<(), CliError> {
    let entry = resolve_entry(editor, id).await?;

    let deleted = editor.delete(&entry).await;
    print_toast(editor.toasts());
    if !deleted {
        return Err(CliError::DeleteFailed(entry.id));
    }

    println!("{}", entry.id);
    Ok(())
}
