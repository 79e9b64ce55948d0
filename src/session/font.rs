use std::sync::{Arc, Mutex, PoisonError};

use memo_types::{EditorFontSetting, FontFormat, InstalledFont, MemoHost};

use crate::store::SettingsStore;
use crate::toast::ToastQueue;

/// 自定义字体在编辑器中使用的统一族名
pub const USER_FONT_FAMILY: &str = "MemoUserSans";

/// 已解析好的字体，可直接生成 `@font-face`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub id: String,
    pub label: String,
    pub path: String,
    pub format: FontFormat,
}

impl FontFace {
    pub fn css(&self) -> String {
        format!(
            "@font-face {{\n  font-family: \"{}\";\n  src: url(\"{}\") format(\"{}\");\n  font-weight: normal;\n  font-style: normal;\n  font-display: swap;\n}}",
            USER_FONT_FAMILY,
            self.path,
            self.format.css_format()
        )
    }

    /// 带回退的字体栈
    pub fn family_stack(&self) -> String {
        format!("\"{}\", system-ui, sans-serif", USER_FONT_FAMILY)
    }
}

/// 编辑器字体的安装、切换与加载
pub struct FontService {
    host: Arc<dyn MemoHost>,
    settings: SettingsStore,
    toasts: ToastQueue,
    loaded: Mutex<Option<FontFace>>,
}

impl FontService {
    pub fn new(host: Arc<dyn MemoHost>, settings: SettingsStore, toasts: ToastQueue) -> Self {
        Self {
            host,
            settings,
            toasts,
            loaded: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn list(&self) -> Vec<InstalledFont> {
        self.settings.with(|s| s.installed_fonts.clone())
    }

    /// 安装字体并设为编辑器字体；未给出路径时弹出文件选择
    pub async fn install(&self, path: Option<&str>) -> Option<InstalledFont> {
        let picked = match path {
            Some(path) => Some(path.to_string()),
            None => match self.host.pick_font_file().await {
                Ok(picked) => picked,
                Err(e) => {
                    tracing::error!("Failed to pick font file: {:#}", e);
                    self.toasts.error("Failed to install font");
                    return None;
                }
            },
        };
        // 用户取消
        let path = picked?;

        let label = font_label(&path);
        match self.host.install_font(&path, &label).await {
            Ok(font) => {
                self.settings.add_installed_font(font.clone());
                self.settings
                    .set_editor_font(EditorFontSetting::from_installed(&font));
                tracing::debug!("Installed font {} as {}", label, font.id);
                self.toasts.success(format!("Applied font \"{}\"", label));
                Some(font)
            }
            Err(e) => {
                tracing::error!("Failed to install font: {:#}", e);
                self.toasts.error("Failed to install font");
                None
            }
        }
    }

    pub fn reset_to_default(&self) {
        self.settings.reset_editor_font_to_default();
        self.toasts.success("Reverted to the default font");
    }

    /// 删除已安装的字体文件；正在使用时回到默认字体
    pub async fn remove(&self, id: &str) -> bool {
        let Some(font) = self.settings.with(|s| s.font(id).cloned()) else {
            self.toasts.info(format!("No installed font with id {}", id));
            return false;
        };

        if let Err(e) = self.host.delete_installed_font(id, font.format).await {
            tracing::error!("Failed to remove font {}: {:#}", id, e);
            self.toasts
                .error(format!("Failed to remove font: {:#}", e));
            return false;
        }

        self.settings.remove_installed_font(id);
        self.toasts
            .success(format!("Removed font \"{}\"", font.label));
        true
    }

    /// 解析当前编辑器字体
    ///
    /// 默认字体返回 `None`。已加载的字体直接复用。解析失败时回退到默认字体
    /// 并重置设置。
    pub async fn load(&self) -> Option<FontFace> {
        let EditorFontSetting::File { id, label, format } = self.settings.editor_font() else {
            *self.loaded() = None;
            return None;
        };

        let cached = self.loaded().clone().filter(|f| f.id == id);
        if cached.is_some() {
            return cached;
        }

        match self.host.get_installed_font_path(&id, format).await {
            Ok(path) => {
                let face = FontFace {
                    id,
                    label,
                    path,
                    format,
                };
                *self.loaded() = Some(face.clone());
                Some(face)
            }
            Err(e) => {
                tracing::warn!("Failed to load custom font {}: {:#}", label, e);
                *self.loaded() = None;
                self.settings.reset_editor_font_to_default();
                None
            }
        }
    }

    fn loaded(&self) -> std::sync::MutexGuard<'_, Option<FontFace>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 由文件路径得到字体显示名（去掉目录与扩展名）
pub fn font_label(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    if stem.is_empty() {
        "Custom Font".to_string()
    } else {
        stem.to_string()
    }
}
