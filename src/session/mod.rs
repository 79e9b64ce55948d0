//! 应用会话：把状态容器、控制器、保存策略、编辑器和字体串在一起
//!
//! 对外的每个方法对应一个用户动作。切换目录、切换/新建/重命名备忘录之前
//! 都会先把未保存的内容写回。

mod controller;
mod font;
mod save;
#[cfg(test)]
pub mod testing;

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use memo_types::{MemoHost, MemoMeta};

use crate::config::{AppConfig, SaveMode};
use crate::editor::{EditorAdapter, EditorChange, EditorMode, EditorView};
use crate::store::{MemoState, MemoStore, SettingsState, SettingsStore, StateFile};
use crate::toast::ToastQueue;

pub use controller::{MemoController, OpenOutcome};
pub use font::FontService;
use save::SaveCoordinator;

pub struct Session {
    store: MemoStore,
    settings: SettingsStore,
    toasts: ToastQueue,
    controller: Arc<MemoController>,
    saver: SaveCoordinator,
    fonts: FontService,
    editor: Mutex<EditorAdapter>,
    session_file: StateFile,
    settings_file: StateFile,
}

impl Session {
    /// 用配置和宿主构建会话，并读入上次保存的会话与设置
    pub fn new(config: &AppConfig, host: Arc<dyn MemoHost>) -> Self {
        let session_file = StateFile::new(config.session_file());
        let settings_file = StateFile::new(config.settings_file());

        let store = MemoStore::new(MemoState::from_session(session_file.load()));
        let settings = SettingsStore::new(SettingsState::from_persisted(settings_file.load()));
        let toasts = ToastQueue::new(config.toast_timeout());

        let controller = Arc::new(MemoController::new(
            Arc::clone(&host),
            store.clone(),
            toasts.clone(),
        ));
        let saver = SaveCoordinator::new(
            config.save.mode,
            config.autosave_delay(),
            controller.clone(),
        );
        let fonts = FontService::new(host, settings.clone(), toasts.clone());

        Self {
            store,
            settings,
            toasts,
            controller,
            saver,
            fonts,
            editor: Mutex::new(EditorAdapter::new(config.editor.mode)),
            session_file,
            settings_file,
        }
    }

    /// 恢复上次的目录和选中项，并加载编辑器字体
    pub async fn start(&self) {
        self.controller.restore().await;
        self.sync_saver();
        self.fonts.load().await;
    }

    pub fn store(&self) -> &MemoStore {
        &self.store
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn fonts(&self) -> &FontService {
        &self.fonts
    }

    pub fn save_mode(&self) -> SaveMode {
        self.saver.mode()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.saver.has_pending()
    }

    pub async fn select_folder(&self) -> bool {
        if !self.flush().await {
            return false;
        }
        let switched = self.controller.select_folder().await;
        self.sync_saver();
        switched
    }

    pub async fn open_folder(&self, folder: &str) -> bool {
        if !self.flush().await {
            return false;
        }
        let listed = self.controller.switch_folder(folder).await.is_some();
        self.sync_saver();
        listed
    }

    /// 打开备忘录；之前那篇的未保存内容会先写回
    pub async fn select_memo(&self, path: &str) -> OpenOutcome {
        if !self.flush().await {
            return OpenOutcome::Failed;
        }
        let outcome = self.controller.open_memo(path).await;
        self.sync_saver();
        outcome
    }

    pub async fn create_memo(&self, name: Option<&str>) -> Option<MemoMeta> {
        if !self.flush().await {
            return None;
        }
        let created = self.controller.create_memo(name).await;
        self.sync_saver();
        created
    }

    /// 删除备忘录；进行中的保存先完成，删除期间不再写入
    pub async fn delete_memo(&self, path: &str) -> bool {
        let paused = self.saver.pause().await;
        let deleted = self.controller.delete_memo(path).await;
        self.sync_saver();
        drop(paused);
        deleted
    }

    pub async fn rename_memo(&self, path: &str, new_name: &str) -> Option<MemoMeta> {
        if !self.flush().await {
            return None;
        }
        let renamed = self.controller.rename_memo(path, new_name).await;
        self.sync_saver();
        renamed
    }

    pub fn set_editor_mode(&self, mode: EditorMode) {
        self.editor().set_mode(mode);
    }

    pub fn editor_view(&self) -> EditorView {
        let mut editor = self.editor();
        self.store.with(|state| editor.view(state))
    }

    /// 应用编辑器发出的修改；来自过期实例的修改被丢弃
    pub fn edit(&self, change: EditorChange) -> bool {
        let EditorChange { key, content } = change;
        if !self.store.edit_content(&key, content) {
            tracing::trace!("Ignored change from editor {}", key);
            return false;
        }
        self.sync_saver();
        true
    }

    /// 显式保存；内容未变化时什么也不做
    pub async fn save_now(&self) -> bool {
        match self.saver.save_now().await {
            Ok(true) => {
                let name = self
                    .store
                    .with(|s| s.current_memo.as_ref().map(|m| m.name().to_string()));
                if let Some(name) = name {
                    self.toasts.success(format!("Saved \"{}\"", name));
                }
                true
            }
            Ok(false) => false,
            // 控制器已经提示过错误
            Err(_) => false,
        }
    }

    /// 写回未保存内容并持久化会话与设置
    pub async fn shutdown(&self) -> Result<()> {
        let flushed = self.saver.flush().await;

        self.session_file.save(&self.store.session())?;
        self.settings_file.save(&self.settings.persisted())?;
        tracing::debug!("Session saved to {}", self.session_file.path().display());

        flushed
            .map(|_| ())
            .context("Unsaved changes could not be written")
    }

    /// 让保存策略看到当前备忘录的最新状态
    fn sync_saver(&self) {
        match self.store.current() {
            Some((path, content)) => self.saver.observe(Some(&path), &content),
            None => self.saver.observe(None, ""),
        }
    }

    /// 写回失败时返回 false，调用方应放弃切换以免丢失修改
    async fn flush(&self) -> bool {
        match self.saver.flush().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Keeping the current memo open, flush failed: {:#}", e);
                false
            }
        }
    }

    fn editor(&self) -> MutexGuard<'_, EditorAdapter> {
        self.editor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
