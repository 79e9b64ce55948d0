use anyhow::Result;
use dialoguer::Input;
use std::path::PathBuf;

use memo_types::PathPicker;

/// 用终端输入代替系统对话框
///
/// 空输入视为取消；非交互终端下直接视为取消。
pub struct PromptPicker;

impl PromptPicker {
    fn prompt(&self, prompt: &str) -> Result<Option<PathBuf>> {
        if !console::user_attended() {
            tracing::debug!("Not attached to a terminal, skipping prompt: {}", prompt);
            return Ok(None);
        }

        let input: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(parse_path(&input))
    }
}

impl PathPicker for PromptPicker {
    fn pick_folder(&self) -> Result<Option<PathBuf>> {
        self.prompt("Memo folder")
    }

    fn pick_file(&self, title: &str, extensions: &[&str]) -> Result<Option<PathBuf>> {
        self.prompt(&format!("{} ({})", title, extensions.join(", ")))
    }
}

/// 去掉空白并展开 `~`；空输入返回 None
pub fn parse_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(trimmed).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("   "), None);
        assert_eq!(parse_path(" /tmp/notes "), Some(PathBuf::from("/tmp/notes")));

        let home = dirs::home_dir().unwrap();
        assert_eq!(parse_path("~/notes"), Some(home.join("notes")));
    }
}
