use anyhow::Result;

use crate::service::resolve_memo;
use crate::session::Session;
use crate::ui::Output;

pub async fn rename(session: &Session, memo: &str, name: &str) -> Result<()> {
    let output = Output::new();
    let meta = session.store().with(|s| resolve_memo(s, memo))?;

    if let Some(renamed) = session.rename_memo(&meta.path, name).await {
        output.status("Renamed", &format!("{} -> {}", meta.path, renamed.path));
    }
    Ok(())
}
