use anyhow::Result;

use crate::config::SaveMode;
use crate::session::Session;
use crate::ui::Output;

pub async fn status(session: &Session) -> Result<()> {
    let output = Output::new();
    let state = session.store().snapshot();

    match state.working_folder.as_deref() {
        Some(folder) => output.folder_info(folder, state.memos.len()),
        None => output.note("No folder is open"),
    }

    let selected = match state.current_memo.as_ref() {
        Some(memo) if session.has_unsaved_changes() => format!("{} (unsaved)", memo.name()),
        Some(memo) => memo.name().to_string(),
        None => "none".to_string(),
    };
    output.info(&format!("Selected: {}", selected));
    let mode = match session.save_mode() {
        SaveMode::Auto => "auto",
        SaveMode::Manual => "manual",
    };
    output.info(&format!("Save mode: {}", mode));
    output.info(&format!(
        "Editor font: {}",
        session.settings().editor_font().label()
    ));
    Ok(())
}
