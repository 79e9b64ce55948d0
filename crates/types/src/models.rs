use serde::{Deserialize, Serialize};

/// 备忘录元数据（列表项）
///
/// `path` 是唯一标识；时间戳为 epoch 毫秒
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoMeta {
    pub path: String,
    pub name: String,
    pub created_at: i64,
    pub modified_at: i64,
}

/// 当前打开的备忘录（元数据 + 全文）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoFile {
    #[serde(flatten)]
    pub meta: MemoMeta,
    pub content: String,
}

impl MemoFile {
    pub fn new(meta: MemoMeta, content: impl Into<String>) -> Self {
        Self {
            meta,
            content: content.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.meta.path
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// 元数据的部分更新（路径不可经此修改，重命名走 rename）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoMetaPatch {
    pub name: Option<String>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
}

impl MemoMetaPatch {
    pub fn apply_to(&self, meta: &mut MemoMeta) {
        if let Some(name) = &self.name {
            meta.name = name.clone();
        }
        if let Some(created_at) = self.created_at {
            meta.created_at = created_at;
        }
        if let Some(modified_at) = self.modified_at {
            meta.modified_at = modified_at;
        }
    }
}

impl From<MemoMeta> for MemoMetaPatch {
    fn from(meta: MemoMeta) -> Self {
        Self {
            name: Some(meta.name),
            created_at: Some(meta.created_at),
            modified_at: Some(meta.modified_at),
        }
    }
}

/// 按修改时间倒序排列（稳定排序，相同时间保持原有顺序）
pub fn sort_by_recent(memos: &mut [MemoMeta]) {
    memos.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
}

/// 支持安装的字体格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Ttf,
    Otf,
    Woff,
    Woff2,
}

impl FontFormat {
    pub const EXTENSIONS: [&'static str; 4] = ["ttf", "otf", "woff", "woff2"];

    /// 根据文件扩展名识别（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttf" => Some(Self::Ttf),
            "otf" => Some(Self::Otf),
            "woff" => Some(Self::Woff),
            "woff2" => Some(Self::Woff2),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Otf => "otf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }

    /// `@font-face` 中 `format(...)` 使用的名称
    pub fn css_format(self) -> &'static str {
        match self {
            Self::Ttf => "truetype",
            Self::Otf => "opentype",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
        }
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// 已安装到应用目录的字体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledFont {
    pub id: String,
    pub label: String,
    pub filename: String,
    pub format: FontFormat,
    pub installed_at: i64,
}

/// 编辑器字体设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditorFontSetting {
    #[default]
    Default,
    File {
        id: String,
        label: String,
        format: FontFormat,
    },
}

impl EditorFontSetting {
    pub fn from_installed(font: &InstalledFont) -> Self {
        Self::File {
            id: font.id.clone(),
            label: font.label.clone(),
            format: font.format,
        }
    }

    pub fn uses_font(&self, font_id: &str) -> bool {
        matches!(self, Self::File { id, .. } if id == font_id)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Default => "Default",
            Self::File { label, .. } => label,
        }
    }
}
