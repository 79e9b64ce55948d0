use anyhow::Result;

use crate::service::resolve_memo;
use crate::session::Session;
use crate::ui::Output;

/// 删除备忘录（默认需要确认）
pub async fn delete(session: &Session, memo: &str, skip_confirm: bool) -> Result<()> {
    let output = Output::new();
    let meta = session.store().with(|s| resolve_memo(s, memo))?;

    output.warning(&format!("this will delete \"{}\"", meta.name));
    output.info(&meta.path);

    if !skip_confirm && !output.confirm("Delete this memo?")? {
        output.info("Operation cancelled");
        return Ok(());
    }

    session.delete_memo(&meta.path).await;
    Ok(())
}
