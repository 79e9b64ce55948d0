use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use memo_types::{EditorFontSetting, InstalledFont};

/// 跨重启保留的会话状态（工作目录 + 选中项）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedSession {
    pub working_folder: Option<String>,
    pub selected_memo_path: Option<String>,
}

/// 跨重启保留的设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedSettings {
    pub editor_font: EditorFontSetting,
    pub installed_fonts: Vec<InstalledFont>,
}

/// JSON 状态文件
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取状态；文件不存在或已损坏时返回默认值
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        if !self.path.exists() {
            return T::default();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))
            .and_then(|content| {
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse state file: {}", self.path.display())
                })
            });

        match parsed {
            Ok(value) => {
                tracing::debug!("Loaded state from: {}", self.path.display());
                value
            }
            Err(e) => {
                tracing::warn!("{:#}, falling back to defaults", e);
                T::default()
            }
        }
    }

    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create state directory: {}", dir.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(value).with_context(|| "Failed to serialize state")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;

        Ok(())
    }
}
