use std::path::PathBuf;

/// 本地宿主的错误类型
#[derive(Debug, thiserror::Error)]
pub enum LocalHostError {
    #[error("Invalid folder path: {}", .0.display())]
    InvalidFolder(PathBuf),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is outside the working folder: {}", .0.display())]
    OutsideFolder(PathBuf),

    #[error("A memo named '{0}' already exists")]
    AlreadyExists(String),

    #[error("Unsupported font format: {0} (expected ttf, otf, woff or woff2)")]
    UnsupportedFontFormat(String),

    #[error("Invalid font id: {0}")]
    InvalidFontId(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LocalHostError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type LocalResult<T> = std::result::Result<T, LocalHostError>;
