use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use memo_types::{MemoHost, MemoMeta};

use crate::store::MemoStore;
use crate::toast::ToastQueue;

/// `open_memo` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// 被之后发起的打开请求取代，结果已丢弃
    Superseded,
    Failed,
}

/// 目录/备忘录控制器
///
/// 负责编排宿主调用与状态更新。所有宿主错误都在这里被捕获：记录日志、
/// 弹出错误提示，状态保持在最后一次成功的样子。
pub struct MemoController {
    host: Arc<dyn MemoHost>,
    store: MemoStore,
    toasts: ToastQueue,
    open_seq: AtomicU64,
}

impl MemoController {
    pub fn new(host: Arc<dyn MemoHost>, store: MemoStore, toasts: ToastQueue) -> Self {
        Self {
            host,
            store,
            toasts,
            open_seq: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &MemoStore {
        &self.store
    }

    /// 弹出目录选择并切换过去；用户取消或失败时返回 false
    pub async fn select_folder(&self) -> bool {
        let picked = self.host.select_folder().await;
        match self.report("select folder", picked) {
            Some(Some(folder)) => self.switch_folder(&folder).await.is_some(),
            _ => false,
        }
    }

    /// 切换工作目录
    ///
    /// 换到新目录时清空选中项；重新选择同一目录时，如果之前选中的备忘录
    /// 仍然存在就重新打开它，否则清空选中项。
    pub async fn switch_folder(&self, folder: &str) -> Option<Vec<MemoMeta>> {
        let same = self.store.working_folder().as_deref() == Some(folder);
        let memos = self.load_folder(folder).await?;
        // 切换前发起的打开请求一律作废
        self.invalidate_opens();

        if same {
            self.reopen_selection(&memos).await;
        } else {
            self.store.clear_selection();
        }
        Some(memos)
    }

    /// 启动时恢复上次的目录和选中项
    pub async fn restore(&self) {
        let Some(folder) = self.store.working_folder() else {
            return;
        };
        if let Some(memos) = self.load_folder(&folder).await {
            self.reopen_selection(&memos).await;
        }
    }

    /// 列出目录内容；失败时保留原有目录与列表
    pub async fn load_folder(&self, folder: &str) -> Option<Vec<MemoMeta>> {
        self.store.set_loading(true);
        let result = self.host.list_memos(folder).await;
        let memos = self.report("load folder", result);

        if let Some(memos) = &memos {
            tracing::debug!("Loaded {} memos from {}", memos.len(), folder);
            self.store.set_working_folder(Some(folder.to_string()));
            self.store.set_memos(memos.clone());
        }
        self.store.set_loading(false);
        memos
    }

    async fn reopen_selection(&self, memos: &[MemoMeta]) {
        let Some(selected) = self.store.selected_memo_path() else {
            return;
        };

        if memos.iter().any(|m| m.path == selected) {
            self.open_memo(&selected).await;
        } else {
            tracing::debug!("Previously selected memo is gone: {}", selected);
            self.store.clear_selection();
            self.toasts
                .info(format!("\"{}\" no longer exists", display_name(&selected)));
        }
    }

    /// 打开备忘录
    ///
    /// 每次调用领取一个递增序号；完成时只有序号仍是最新的才应用结果，
    /// 否则静默丢弃（不改 loading，也不提示错误）。
    pub async fn open_memo(&self, path: &str) -> OpenOutcome {
        let request = self.open_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.set_loading(true);

        let result = match self.store.working_folder() {
            Some(folder) => self.host.read_memo(path, &folder).await,
            None => Err(anyhow!("No folder is open")),
        };

        if self.open_seq.load(Ordering::SeqCst) != request {
            tracing::debug!("Discarding stale open of {} (request #{})", path, request);
            return OpenOutcome::Superseded;
        }

        let outcome = match self.report("open memo", result) {
            Some(memo) => {
                self.store.select_memo(Some(path.to_string()));
                self.store.set_current_memo(Some(memo));
                OpenOutcome::Opened
            }
            None => OpenOutcome::Failed,
        };
        self.store.set_loading(false);
        outcome
    }

    /// 让所有进行中的打开请求过期
    fn invalidate_opens(&self) {
        self.open_seq.fetch_add(1, Ordering::SeqCst);
        self.store.set_loading(false);
    }

    /// 保存内容，并把宿主返回的元数据合并回状态
    pub async fn save_memo(&self, path: &str, content: &str) -> Result<MemoMeta> {
        let result = match self.store.working_folder() {
            Some(folder) => self
                .host
                .save_memo(path, content, &folder)
                .await
                .with_context(|| format!("Could not write {}", display_name(path))),
            None => Err(anyhow!("No folder is open")),
        };

        let meta = match result {
            Ok(meta) => meta,
            Err(e) => {
                self.fail("save memo", &e);
                return Err(e);
            }
        };

        self.store.update_memo_meta(path, meta.clone());
        // 保存期间又有新的编辑时保持 dirty
        let unchanged = self.store.with(|s| {
            s.current_memo
                .as_ref()
                .is_some_and(|m| m.path() == path && m.content == content)
        });
        if unchanged {
            self.store.mark_as_saved();
        }

        tracing::debug!("Saved {}", path);
        Ok(meta)
    }

    /// 新建并打开备忘录；未指定名称时使用 `memo-YYYY-MM-DD-HHMM`
    pub async fn create_memo(&self, name: Option<&str>) -> Option<MemoMeta> {
        let Some(folder) = self.store.working_folder() else {
            self.toasts.info("Open a folder first");
            return None;
        };

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| default_memo_name(Local::now()));
        let result = self.host.create_memo(&folder, &name).await;
        let meta = self.report("create memo", result)?;

        self.store.add_memo(meta.clone());
        self.toasts.success(format!("Created \"{}\"", meta.name));

        // 打开失败时列表中的新条目保留
        self.open_memo(&meta.path).await;
        Some(meta)
    }

    pub async fn delete_memo(&self, path: &str) -> bool {
        let Some(folder) = self.store.working_folder() else {
            return false;
        };
        let name = self.memo_name(path);

        let result = self.host.delete_memo(path, &folder).await;
        if self.report("delete memo", result).is_none() {
            return false;
        }

        self.store.remove_memo(path);
        self.toasts.success(format!("Deleted \"{}\"", name));
        true
    }

    pub async fn rename_memo(&self, path: &str, new_name: &str) -> Option<MemoMeta> {
        let folder = self.store.working_folder()?;

        let result = self.host.rename_memo(path, new_name, &folder).await;
        let meta = self.report("rename memo", result)?;

        self.store.rename_memo(path, meta.clone());
        self.toasts.success(format!("Renamed to \"{}\"", meta.name));
        Some(meta)
    }

    fn memo_name(&self, path: &str) -> String {
        self.store
            .with(|s| s.find(path).map(|m| m.name.clone()))
            .unwrap_or_else(|| display_name(path).to_string())
    }

    fn report<T>(&self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(action, &e);
                None
            }
        }
    }

    fn fail(&self, action: &str, error: &anyhow::Error) {
        tracing::error!("Failed to {}: {:#}", action, error);
        self.toasts.error(format!("Failed to {}: {:#}", action, error));
    }
}

/// 新备忘录的默认名称
pub fn default_memo_name<Tz: TimeZone>(now: DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    now.format("memo-%Y-%m-%d-%H%M").to_string()
}

fn display_name(path: &str) -> &str {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file.strip_suffix(".md").unwrap_or(file)
}
