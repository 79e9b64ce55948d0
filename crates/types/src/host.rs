use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::models::{FontFormat, InstalledFont, MemoFile, MemoMeta};

/// 宿主命令接口
///
/// 文件读写、目录列举和字体安装都由宿主完成，前端状态层只通过这个 trait 调用。
/// 所有调用都可能失败，错误信息应当可以直接展示给用户。
#[async_trait]
pub trait MemoHost: Send + Sync {
    /// 弹出目录选择；用户取消时返回 None
    async fn select_folder(&self) -> Result<Option<String>>;

    /// 列出目录下的备忘录
    async fn list_memos(&self, folder: &str) -> Result<Vec<MemoMeta>>;

    /// 读取备忘录全文
    async fn read_memo(&self, path: &str, folder: &str) -> Result<MemoFile>;

    /// 保存内容并返回最新元数据
    async fn save_memo(&self, path: &str, content: &str, folder: &str) -> Result<MemoMeta>;

    /// 新建空备忘录（名称冲突时由宿主决定最终文件名）
    async fn create_memo(&self, folder: &str, name: &str) -> Result<MemoMeta>;

    async fn delete_memo(&self, path: &str, folder: &str) -> Result<()>;

    /// 重命名并返回新的元数据（path 会变化）
    async fn rename_memo(&self, path: &str, new_name: &str, folder: &str) -> Result<MemoMeta>;

    /// 弹出字体文件选择；用户取消时返回 None
    async fn pick_font_file(&self) -> Result<Option<String>>;

    async fn install_font(&self, path: &str, label: &str) -> Result<InstalledFont>;

    async fn get_installed_font_path(&self, id: &str, format: FontFormat) -> Result<String>;

    async fn delete_installed_font(&self, id: &str, format: FontFormat) -> Result<()>;
}

/// 系统对话框的抽象（目录/文件选择）
pub trait PathPicker: Send + Sync {
    fn pick_folder(&self) -> Result<Option<PathBuf>>;

    fn pick_file(&self, title: &str, extensions: &[&str]) -> Result<Option<PathBuf>>;
}
