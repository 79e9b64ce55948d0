use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use memo_types::{FontFormat, InstalledFont};

use crate::error::{LocalHostError, LocalResult};

/// 应用私有的字体目录
///
/// 安装的字体以 `<uuid>.<ext>` 命名，与用户原始文件解耦。
#[derive(Debug, Clone)]
pub struct FontStore {
    dir: PathBuf,
}

impl FontStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 复制字体文件到字体目录
    pub async fn install(&self, source: &Path, label: &str) -> LocalResult<InstalledFont> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = FontFormat::from_extension(ext)
            .ok_or_else(|| LocalHostError::UnsupportedFontFormat(ext.to_string()))?;

        match fs::metadata(source).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(LocalHostError::NotFound(source.to_path_buf())),
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| LocalHostError::io(&self.dir, e))?;

        let id = Uuid::new_v4().to_string();
        let filename = format!("{}.{}", id, format.extension());
        let target = self.dir.join(&filename);
        fs::copy(source, &target)
            .await
            .map_err(|e| LocalHostError::io(&target, e))?;

        tracing::debug!("Installed font '{}' at {}", label, target.display());

        Ok(InstalledFont {
            id,
            label: label.to_string(),
            filename,
            format,
            installed_at: Utc::now().timestamp_millis(),
        })
    }

    /// 已安装字体的路径（文件必须存在）
    pub async fn path_of(&self, id: &str, format: FontFormat) -> LocalResult<PathBuf> {
        let path = self.file_path(id, format)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(LocalHostError::NotFound(path)),
        }
    }

    /// 删除已安装字体；文件已不存在视为成功
    pub async fn remove(&self, id: &str, format: FontFormat) -> LocalResult<()> {
        let path = self.file_path(id, format)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Font file already gone: {}", path.display());
                Ok(())
            }
            Err(e) => Err(LocalHostError::io(&path, e)),
        }
    }

    fn file_path(&self, id: &str, format: FontFormat) -> LocalResult<PathBuf> {
        // id 必须是 uuid，避免拼出字体目录之外的路径
        let id = Uuid::parse_str(id).map_err(|_| LocalHostError::InvalidFontId(id.to_string()))?;
        Ok(self.dir.join(format!("{}.{}", id, format.extension())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_install_and_remove() {
        let fonts = tempfile::tempdir().unwrap();
        let src_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("Inter.TTF");
        std::fs::write(&source, b"fake font").unwrap();

        let store = FontStore::new(fonts.path().join("fonts"));
        let font = store.install(&source, "Inter").await.unwrap();

        assert_eq!(font.label, "Inter");
        assert_eq!(font.format, FontFormat::Ttf);
        assert!(font.filename.ends_with(".ttf"));

        let path = store.path_of(&font.id, font.format).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"fake font");

        store.remove(&font.id, font.format).await.unwrap();
        assert!(store.path_of(&font.id, font.format).await.is_err());
        // 重复删除不报错
        store.remove(&font.id, font.format).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_unknown_format() {
        let fonts = tempfile::tempdir().unwrap();
        let source = fonts.path().join("font.svg");
        std::fs::write(&source, b"<svg/>").unwrap();

        let store = FontStore::new(fonts.path());
        let err = store.install(&source, "svg").await.unwrap_err();
        assert!(matches!(err, LocalHostError::UnsupportedFontFormat(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_like_id() {
        let store = FontStore::new("/tmp/fonts");
        let err = store
            .path_of("../../etc/passwd", FontFormat::Ttf)
            .await
            .unwrap_err();
        assert!(matches!(err, LocalHostError::InvalidFontId(_)));
    }
}
