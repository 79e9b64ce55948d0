use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;

use crate::editor::EditorView;
use crate::service::resolve_memo;
use crate::session::{OpenOutcome, Session};
use crate::ui::Output;

/// 用文件或标准输入的内容替换备忘录正文并立即保存
pub async fn write(session: &Session, memo: &str, file: Option<PathBuf>) -> Result<()> {
    let output = Output::new();
    let meta = session.store().with(|s| resolve_memo(s, memo))?;

    let content = match file {
        Some(file) => tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if session.select_memo(&meta.path).await != OpenOutcome::Opened {
        return Ok(());
    }
    let EditorView::Editing(editor) = session.editor_view() else {
        return Ok(());
    };

    if !session.edit(editor.change(content)) {
        output.info("Content unchanged, nothing to write.");
        return Ok(());
    }

    output.status("Writing", &meta.path);
    session.save_now().await;
    Ok(())
}
