use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use memo_types::{FontFormat, InstalledFont, MemoFile, MemoHost, MemoMeta, PathPicker};

use crate::error::LocalHostError;
use crate::font_store::FontStore;
use crate::memo_fs;

/// 基于本地文件系统的宿主客户端
pub struct LocalHostClient {
    fonts: FontStore,
    picker: Arc<dyn PathPicker>,
}

impl LocalHostClient {
    pub fn new(fonts_dir: impl Into<PathBuf>, picker: Arc<dyn PathPicker>) -> Self {
        Self {
            fonts: FontStore::new(fonts_dir),
            picker,
        }
    }
}

#[async_trait]
impl MemoHost for LocalHostClient {
    async fn select_folder(&self) -> Result<Option<String>> {
        let picker = Arc::clone(&self.picker);
        let picked = tokio::task::spawn_blocking(move || picker.pick_folder())
            .await
            .context("Folder picker task failed")??;

        Ok(picked.map(|p| p.to_string_lossy().to_string()))
    }

    async fn list_memos(&self, folder: &str) -> Result<Vec<MemoMeta>> {
        Ok(memo_fs::list(folder).await?)
    }

    async fn read_memo(&self, path: &str, folder: &str) -> Result<MemoFile> {
        let file = memo_fs::resolve_in_folder(path, folder).await?;
        let meta = memo_fs::memo_meta(&file).await?;
        let content = fs::read_to_string(&file)
            .await
            .map_err(|e| LocalHostError::io(&file, e))?;

        Ok(MemoFile::new(meta, content))
    }

    async fn save_memo(&self, path: &str, content: &str, folder: &str) -> Result<MemoMeta> {
        let file = memo_fs::resolve_in_folder(path, folder).await?;
        fs::write(&file, content)
            .await
            .map_err(|e| LocalHostError::io(&file, e))?;

        tracing::debug!("Saved {} ({} bytes)", file.display(), content.len());
        Ok(memo_fs::memo_meta(&file).await?)
    }

    async fn create_memo(&self, folder: &str, name: &str) -> Result<MemoMeta> {
        memo_fs::canonical_folder(folder).await?;

        let name = memo_fs::sanitize_name(name);
        let file = memo_fs::create_unique(Path::new(folder), &name).await?;

        tracing::debug!("Created {}", file.display());
        Ok(memo_fs::memo_meta(&file).await?)
    }

    async fn delete_memo(&self, path: &str, folder: &str) -> Result<()> {
        let file = memo_fs::resolve_in_folder(path, folder).await?;
        memo_fs::memo_meta(&file).await?;
        fs::remove_file(&file)
            .await
            .map_err(|e| LocalHostError::io(&file, e))?;

        tracing::debug!("Deleted {}", file.display());
        Ok(())
    }

    async fn rename_memo(&self, path: &str, new_name: &str, folder: &str) -> Result<MemoMeta> {
        let source = memo_fs::resolve_in_folder(path, folder).await?;
        memo_fs::memo_meta(&source).await?;

        let name = memo_fs::sanitize_name(new_name);
        let parent = source.parent().unwrap_or_else(|| Path::new(folder));
        let target = memo_fs::memo_path(parent, &name);

        if target == source {
            return Ok(memo_fs::memo_meta(&source).await?);
        }

        let exists = fs::try_exists(&target)
            .await
            .map_err(|e| LocalHostError::io(&target, e))?;
        if exists {
            return Err(LocalHostError::AlreadyExists(name).into());
        }

        fs::rename(&source, &target)
            .await
            .map_err(|e| LocalHostError::io(&source, e))?;

        tracing::debug!("Renamed {} -> {}", source.display(), target.display());
        Ok(memo_fs::memo_meta(&target).await?)
    }

    async fn pick_font_file(&self) -> Result<Option<String>> {
        let picker = Arc::clone(&self.picker);
        let picked = tokio::task::spawn_blocking(move || {
            picker.pick_file("Select a font file", &FontFormat::EXTENSIONS)
        })
        .await
        .context("Font picker task failed")??;

        Ok(picked.map(|p| p.to_string_lossy().to_string()))
    }

    async fn install_font(&self, path: &str, label: &str) -> Result<InstalledFont> {
        Ok(self.fonts.install(Path::new(path), label).await?)
    }

    async fn get_installed_font_path(&self, id: &str, format: FontFormat) -> Result<String> {
        let path = self.fonts.path_of(id, format).await?;
        Ok(path.to_string_lossy().to_string())
    }

    async fn delete_installed_font(&self, id: &str, format: FontFormat) -> Result<()> {
        Ok(self.fonts.remove(id, format).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPicker {
        folder: Option<PathBuf>,
    }

    impl PathPicker for FixedPicker {
        fn pick_folder(&self) -> Result<Option<PathBuf>> {
            Ok(self.folder.clone())
        }

        fn pick_file(&self, _title: &str, _extensions: &[&str]) -> Result<Option<PathBuf>> {
            Ok(None)
        }
    }

    fn client(fonts: &Path, folder: Option<PathBuf>) -> LocalHostClient {
        LocalHostClient::new(fonts, Arc::new(FixedPicker { folder }))
    }

    #[tokio::test]
    async fn test_memo_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();
        let host = client(&dir.path().join(".fonts"), None);

        let meta = host.create_memo(&folder, "  todo ").await.unwrap();
        assert_eq!(meta.name, "todo");

        let saved = host.save_memo(&meta.path, "# Todo", &folder).await.unwrap();
        assert_eq!(saved.path, meta.path);

        let file = host.read_memo(&meta.path, &folder).await.unwrap();
        assert_eq!(file.content, "# Todo");

        let renamed = host.rename_memo(&meta.path, "done", &folder).await.unwrap();
        assert_eq!(renamed.name, "done");
        assert!(host.read_memo(&meta.path, &folder).await.is_err());
        assert_eq!(
            host.read_memo(&renamed.path, &folder).await.unwrap().content,
            "# Todo"
        );

        host.delete_memo(&renamed.path, &folder).await.unwrap();
        assert!(host.list_memos(&folder).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_only_markdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join(".c.md"), "c").unwrap();
        std::fs::create_dir(dir.path().join("sub.md")).unwrap();

        let host = client(dir.path(), None);
        let memos = host
            .list_memos(&dir.path().to_string_lossy())
            .await
            .unwrap();

        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].name, "a");
    }

    #[tokio::test]
    async fn test_list_invalid_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let host = client(dir.path(), None);

        let err = host
            .list_memos(&missing.to_string_lossy())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid folder path"));
    }

    #[tokio::test]
    async fn test_rename_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();
        let host = client(dir.path(), None);

        let a = host.create_memo(&folder, "a").await.unwrap();
        host.create_memo(&folder, "b").await.unwrap();

        let err = host.rename_memo(&a.path, "b", &folder).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_read_outside_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let secret = other.path().join("secret.md");
        std::fs::write(&secret, "secret").unwrap();

        let host = client(dir.path(), None);
        let err = host
            .read_memo(&secret.to_string_lossy(), &dir.path().to_string_lossy())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("outside the working folder"));
    }

    #[tokio::test]
    async fn test_select_folder_uses_picker() {
        let dir = tempfile::tempdir().unwrap();
        let host = client(dir.path(), Some(dir.path().to_path_buf()));

        let picked = host.select_folder().await.unwrap();
        assert_eq!(picked, Some(dir.path().to_string_lossy().to_string()));
        assert_eq!(host.pick_font_file().await.unwrap(), None);
    }
}
