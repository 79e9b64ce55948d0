use anyhow::Result;

use crate::session::Session;
use crate::ui::Output;

pub async fn new(session: &Session, name: Option<String>) -> Result<()> {
    let output = Output::new();

    if let Some(meta) = session.create_memo(name.as_deref()).await {
        output.status("Created", &meta.path);
    }
    Ok(())
}
