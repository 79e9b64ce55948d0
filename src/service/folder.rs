use anyhow::{Context, Result};

use crate::session::Session;
use crate::ui::{parse_path, Output};

/// 打开（或重新打开）工作目录；未给出路径时提示输入
pub async fn folder(session: &Session, path: Option<String>) -> Result<()> {
    let output = Output::new();

    let opened = match path.as_deref().and_then(parse_path) {
        Some(path) => {
            let folder = tokio::fs::canonicalize(&path)
                .await
                .with_context(|| format!("Folder not found: {}", path.display()))?;
            let folder = folder.to_string_lossy().to_string();
            output.status("Opening", &folder);
            session.open_folder(&folder).await
        }
        None => session.select_folder().await,
    };

    if !opened {
        return Ok(());
    }

    let state = session.store().snapshot();
    if let Some(folder) = state.working_folder.as_deref() {
        output.folder_info(folder, state.memos.len());
    }
    output.memo_list(&state.memos, state.selected_memo_path.as_deref());
    Ok(())
}
