use anyhow::Result;

use crate::editor::{EditorMode, EditorView};
use crate::service::resolve_memo;
use crate::session::{OpenOutcome, Session};
use crate::ui::Output;

pub async fn open(session: &Session, memo: &str, raw: bool) -> Result<()> {
    let output = Output::new();
    let meta = session.store().with(|s| resolve_memo(s, memo))?;

    if raw {
        session.set_editor_mode(EditorMode::Raw);
    }
    if session.select_memo(&meta.path).await != OpenOutcome::Opened {
        return Ok(());
    }

    if let EditorView::Editing(editor) = session.editor_view() {
        let meta = session
            .store()
            .with(|s| s.find(&editor.key).cloned())
            .unwrap_or(meta);
        output.memo_body(&meta, &editor.render());
    }
    Ok(())
}
