use anyhow::Result;

use crate::session::Session;
use crate::ui::Output;

pub async fn list(session: &Session) -> Result<()> {
    let output = Output::new();
    let state = session.store().snapshot();

    let Some(folder) = state.working_folder.as_deref() else {
        output.info("No folder is open. Use 'memo folder <PATH>' first.");
        return Ok(());
    };

    // 显示目录信息
    output.folder_info(folder, state.memos.len());

    if state.memos.is_empty() {
        output.info("No memos found. Use 'memo new' to create one!");
        return Ok(());
    }

    output.memo_list(&state.memos, state.selected_memo_path.as_deref());
    Ok(())
}
