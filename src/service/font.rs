use anyhow::Result;

use crate::cli::FontCommands;
use crate::session::Session;
use crate::ui::Output;

pub async fn font(session: &Session, command: FontCommands) -> Result<()> {
    let output = Output::new();
    let fonts = session.fonts();

    match command {
        FontCommands::Install { path } => {
            if let Some(font) = fonts.install(path.as_deref()).await {
                output.status("Installed", &format!("{} ({})", font.label, font.id));
            }
        }
        FontCommands::Reset => fonts.reset_to_default(),
        FontCommands::List => {
            let installed = fonts.list();
            if installed.is_empty() {
                output.info("No fonts installed. Use 'memo font install' to add one!");
            } else {
                output.font_list(&installed, &session.settings().editor_font());
            }
        }
        FontCommands::Remove { id } => {
            fonts.remove(&id).await;
        }
        FontCommands::Show => match fonts.load().await {
            Some(face) => {
                output.status("Font", &face.label);
                println!("{}", face.css());
                output.info(&format!("font-family: {};", face.family_stack()));
            }
            None => output.info("Using the default font"),
        },
    }
    Ok(())
}
