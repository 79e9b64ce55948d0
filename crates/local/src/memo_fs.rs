use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;

use memo_types::{sort_by_recent, MemoMeta};

use crate::error::{LocalHostError, LocalResult};

const MEMO_EXTENSION: &str = "md";
const DEFAULT_NAME: &str = "untitled";
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// 校验目录存在，返回规范化后的绝对路径（仅用于包含关系判断）
pub(crate) async fn canonical_folder(folder: &str) -> LocalResult<PathBuf> {
    let path = Path::new(folder);
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::canonicalize(path)
            .await
            .map_err(|e| LocalHostError::io(path, e)),
        _ => Err(LocalHostError::InvalidFolder(path.to_path_buf())),
    }
}

/// 确认 `path` 位于 `folder` 内
///
/// 文件本身可以不存在（保存时会重新创建），但其父目录必须存在。
pub(crate) async fn resolve_in_folder(path: &str, folder: &str) -> LocalResult<PathBuf> {
    let folder_canonical = canonical_folder(folder).await?;
    let file = Path::new(path);

    let file_name = file
        .file_name()
        .ok_or_else(|| LocalHostError::OutsideFolder(file.to_path_buf()))?;
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent_canonical = fs::canonicalize(parent)
        .await
        .map_err(|_| LocalHostError::NotFound(file.to_path_buf()))?;

    let resolved = parent_canonical.join(file_name);
    if !resolved.starts_with(&folder_canonical) {
        return Err(LocalHostError::OutsideFolder(file.to_path_buf()));
    }

    Ok(file.to_path_buf())
}

pub(crate) fn is_memo_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));

    !hidden
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(MEMO_EXTENSION))
}

pub(crate) fn memo_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

/// 读取文件的 (modified_at, created_at)，不支持创建时间的平台退回修改时间
fn file_times(meta: &std::fs::Metadata) -> (i64, i64) {
    let modified_at = meta
        .modified()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or(0);
    let created_at = meta
        .created()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or(modified_at);
    (modified_at, created_at)
}

pub(crate) async fn memo_meta(path: &Path) -> LocalResult<MemoMeta> {
    let meta = match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => return Err(LocalHostError::NotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LocalHostError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(LocalHostError::io(path, e)),
    };
    let (modified_at, created_at) = file_times(&meta);

    Ok(MemoMeta {
        path: path.to_string_lossy().to_string(),
        name: memo_name(path),
        created_at,
        modified_at,
    })
}

/// 列出目录下所有备忘录（不递归），按修改时间倒序
pub(crate) async fn list(folder: &str) -> LocalResult<Vec<MemoMeta>> {
    canonical_folder(folder).await?;

    let root = Path::new(folder);
    let mut entries = fs::read_dir(root)
        .await
        .map_err(|e| LocalHostError::io(root, e))?;

    let mut memos = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| LocalHostError::io(root, e))?
    {
        let path = entry.path();
        if !is_memo_file(&path) {
            continue;
        }
        match memo_meta(&path).await {
            Ok(meta) => memos.push(meta),
            // 目录或在列举过程中被删除的文件
            Err(LocalHostError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    sort_by_recent(&mut memos);
    Ok(memos)
}

/// 规范化用户输入的备忘录名称
pub(crate) fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(MEMO_EXTENSION) => stem,
        _ => trimmed,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();

    if cleaned.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

pub(crate) fn memo_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.{}", name, MEMO_EXTENSION))
}

/// 以 `name.md`、`name-1.md`、`name-2.md`... 的顺序创建第一个不存在的文件
pub(crate) async fn create_unique(folder: &Path, name: &str) -> LocalResult<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            memo_path(folder, name)
        } else {
            memo_path(folder, &format!("{}-{}", name, attempt))
        };

        let result = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await;

        match result {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(LocalHostError::io(&candidate, e)),
        }
    }

    Err(LocalHostError::AlreadyExists(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  shopping list "), "shopping list");
        assert_eq!(sanitize_name("notes.md"), "notes");
        assert_eq!(sanitize_name("a/b\\c"), "a-b-c");
        assert_eq!(sanitize_name("   "), "untitled");
        assert_eq!(sanitize_name(".hidden"), "hidden");
    }

    #[test]
    fn test_is_memo_file() {
        assert!(is_memo_file(Path::new("/tmp/a.md")));
        assert!(is_memo_file(Path::new("/tmp/B.MD")));
        assert!(!is_memo_file(Path::new("/tmp/a.txt")));
        assert!(!is_memo_file(Path::new("/tmp/.draft.md")));
    }

    #[tokio::test]
    async fn test_create_unique_appends_counter() {
        let dir = tempfile::tempdir().unwrap();

        let first = create_unique(dir.path(), "memo").await.unwrap();
        let second = create_unique(dir.path(), "memo").await.unwrap();
        let third = create_unique(dir.path(), "memo").await.unwrap();

        assert_eq!(memo_name(&first), "memo");
        assert_eq!(memo_name(&second), "memo-1");
        assert_eq!(memo_name(&third), "memo-2");
    }

    #[tokio::test]
    async fn test_resolve_rejects_outside_path() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();

        let outside = other.path().join("x.md");
        let err = resolve_in_folder(&outside.to_string_lossy(), &folder)
            .await
            .unwrap_err();
        assert!(matches!(err, LocalHostError::OutsideFolder(_)));

        let inside = dir.path().join("x.md");
        assert!(resolve_in_folder(&inside.to_string_lossy(), &folder)
            .await
            .is_ok());
    }
}
