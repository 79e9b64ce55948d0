use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::editor::EditorMode;

/// 保存方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// 内容停止变化一段时间后自动保存
    #[default]
    Auto,
    /// 只在显式保存（或切换备忘录）时保存
    Manual,
}

/// 保存配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveConfig {
    #[serde(default)]
    pub mode: SaveMode,

    /// 自动保存防抖时间（毫秒，默认: 1000）
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            mode: SaveMode::default(),
            autosave_delay_ms: default_autosave_delay_ms(),
        }
    }
}

fn default_autosave_delay_ms() -> u64 {
    1000
}

/// 编辑器配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub mode: EditorMode,
}

/// 提示消息配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToastConfig {
    /// 自动消失时间（毫秒，默认: 4000）
    #[serde(default = "default_toast_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_toast_timeout_ms(),
        }
    }
}

fn default_toast_timeout_ms() -> u64 {
    4000
}

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 状态目录（可选，默认: ~/.memo-desk）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    /// 字体安装目录（可选，默认: <state_dir>/fonts）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts_dir: Option<PathBuf>,

    #[serde(default)]
    pub save: SaveConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub toast: ToastConfig,
}

impl AppConfig {
    /// 全局目录：~/.memo-desk/
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".memo-desk")
    }

    pub fn default_config_path() -> PathBuf {
        Self::global_dir().join("config.toml")
    }

    /// 加载配置
    /// - 显式指定的路径必须存在
    /// - 默认路径不存在时使用默认配置
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration not found at: {}", path.display());
                }
                Self::load_from_path(path)
            }
            None => {
                let path = Self::default_config_path();
                if path.exists() {
                    Self::load_from_path(&path)
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// 从指定路径加载配置文件
    fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;

        tracing::debug!("Loaded app config from: {}", path.display());
        tracing::debug!("Save mode: {:?}", config.save.mode);

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.save.autosave_delay_ms == 0 {
            anyhow::bail!("save.autosave_delay_ms must be greater than 0");
        }
        if self.toast.timeout_ms == 0 {
            anyhow::bail!("toast.timeout_ms must be greater than 0");
        }
        Ok(())
    }

    /// 状态目录（支持 `~` 展开）
    pub fn get_state_dir(&self) -> PathBuf {
        match &self.state_dir {
            Some(dir) => expand(dir),
            None => Self::global_dir(),
        }
    }

    pub fn get_fonts_dir(&self) -> PathBuf {
        match &self.fonts_dir {
            Some(dir) => expand(dir),
            None => self.get_state_dir().join("fonts"),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.get_state_dir().join("session.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.get_state_dir().join("settings.json")
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.save.autosave_delay_ms)
    }

    pub fn toast_timeout(&self) -> Duration {
        Duration::from_millis(self.toast.timeout_ms)
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.save.mode, SaveMode::Auto);
        assert_eq!(config.save.autosave_delay_ms, 1000);
        assert_eq!(config.editor.mode, EditorMode::Rich);
        assert_eq!(config.toast.timeout_ms, 4000);
        assert_eq!(config.get_state_dir(), AppConfig::global_dir());
    }

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
state_dir = "/tmp/memo-state"

[save]
mode = "manual"
autosave_delay_ms = 250

[editor]
mode = "raw"

[toast]
timeout_ms = 1500
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.save.mode, SaveMode::Manual);
        assert_eq!(config.autosave_delay(), Duration::from_millis(250));
        assert_eq!(config.editor.mode, EditorMode::Raw);
        assert_eq!(config.toast_timeout(), Duration::from_millis(1500));
        assert_eq!(
            config.session_file(),
            PathBuf::from("/tmp/memo-state/session.json")
        );
        assert_eq!(config.get_fonts_dir(), PathBuf::from("/tmp/memo-state/fonts"));
    }

    #[test]
    fn test_rejects_zero_delay() {
        let config: AppConfig = toml::from_str("[save]\nautosave_delay_ms = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[save]\nmode = \"manual\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.save.mode, SaveMode::Manual);
    }
}
