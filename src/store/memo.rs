use memo_types::{sort_by_recent, MemoFile, MemoMeta, MemoMetaPatch};

use super::{PersistedSession, Reducer, Store};

/// 备忘录相关的全部客户端状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoState {
    pub working_folder: Option<String>,
    /// 始终按 modified_at 倒序
    pub memos: Vec<MemoMeta>,
    pub selected_memo_path: Option<String>,
    pub current_memo: Option<MemoFile>,
    /// 内存中的内容与最后一次持久化的内容不同
    pub is_dirty: bool,
    pub is_loading: bool,
}

#[derive(Debug, Clone)]
pub enum MemoAction {
    SetWorkingFolder(Option<String>),
    SetMemos(Vec<MemoMeta>),
    SelectMemo(Option<String>),
    SetCurrentMemo(Option<MemoFile>),
    UpdateContent(String),
    /// 只在当前备忘录仍是 `path` 时更新内容
    EditContent { path: String, content: String },
    MarkAsSaved,
    SetLoading(bool),
    AddMemo(MemoMeta),
    RemoveMemo(String),
    UpdateMemoMeta { path: String, patch: MemoMetaPatch },
    RenameMemo { old_path: String, meta: MemoMeta },
}

impl MemoState {
    pub fn from_session(session: PersistedSession) -> Self {
        Self {
            working_folder: session.working_folder,
            selected_memo_path: session.selected_memo_path,
            ..Self::default()
        }
    }

    pub fn session(&self) -> PersistedSession {
        PersistedSession {
            working_folder: self.working_folder.clone(),
            selected_memo_path: self.selected_memo_path.clone(),
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_memo.as_ref().map(|m| m.path())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.memos.iter().any(|m| m.path == path)
    }

    pub fn find(&self, path: &str) -> Option<&MemoMeta> {
        self.memos.iter().find(|m| m.path == path)
    }
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl Reducer for MemoState {
    type Action = MemoAction;

    fn reduce(&mut self, action: MemoAction) -> bool {
        match action {
            MemoAction::SetWorkingFolder(folder) => set_if_changed(&mut self.working_folder, folder),
            MemoAction::SetMemos(mut memos) => {
                sort_by_recent(&mut memos);
                set_if_changed(&mut self.memos, memos)
            }
            MemoAction::SelectMemo(path) => set_if_changed(&mut self.selected_memo_path, path),
            MemoAction::SetCurrentMemo(memo) => {
                let changed = set_if_changed(&mut self.current_memo, memo);
                set_if_changed(&mut self.is_dirty, false) || changed
            }
            MemoAction::UpdateContent(content) => {
                let Some(current) = self.current_memo.as_mut() else {
                    return false;
                };
                if current.content == content {
                    return false;
                }
                current.content = content;
                self.is_dirty = true;
                true
            }
            MemoAction::EditContent { path, content } => {
                if self.current_path() != Some(path.as_str()) {
                    return false;
                }
                self.reduce(MemoAction::UpdateContent(content))
            }
            MemoAction::MarkAsSaved => set_if_changed(&mut self.is_dirty, false),
            MemoAction::SetLoading(loading) => set_if_changed(&mut self.is_loading, loading),
            MemoAction::AddMemo(meta) => {
                self.memos.retain(|m| m.path != meta.path);
                self.memos.insert(0, meta);
                sort_by_recent(&mut self.memos);
                true
            }
            MemoAction::RemoveMemo(path) => {
                let before = self.memos.len();
                self.memos.retain(|m| m.path != path);
                let mut changed = self.memos.len() != before;

                if self.selected_memo_path.as_deref() == Some(path.as_str()) {
                    self.selected_memo_path = None;
                    changed = true;
                }
                if self.current_path() == Some(path.as_str()) {
                    self.current_memo = None;
                    self.is_dirty = false;
                    changed = true;
                }
                changed
            }
            MemoAction::UpdateMemoMeta { path, patch } => {
                let mut changed = false;
                for memo in self.memos.iter_mut().filter(|m| m.path == path) {
                    let before = memo.clone();
                    patch.apply_to(memo);
                    changed |= *memo != before;
                }
                if let Some(current) = self.current_memo.as_mut() {
                    if current.meta.path == path {
                        let before = current.meta.clone();
                        patch.apply_to(&mut current.meta);
                        changed |= current.meta != before;
                    }
                }
                sort_by_recent(&mut self.memos);
                changed
            }
            MemoAction::RenameMemo { old_path, meta } => {
                let mut changed = false;
                for memo in self.memos.iter_mut().filter(|m| m.path == old_path) {
                    *memo = meta.clone();
                    changed = true;
                }
                if self.selected_memo_path.as_deref() == Some(old_path.as_str()) {
                    self.selected_memo_path = Some(meta.path.clone());
                    changed = true;
                }
                if let Some(current) = self.current_memo.as_mut() {
                    if current.meta.path == old_path {
                        // 内容保持不变，只迁移路径和名称
                        current.meta.path = meta.path.clone();
                        current.meta.name = meta.name.clone();
                        changed = true;
                    }
                }
                sort_by_recent(&mut self.memos);
                changed
            }
        }
    }
}

pub type MemoStore = Store<MemoState>;

impl Store<MemoState> {
    pub fn set_working_folder(&self, folder: Option<String>) {
        self.dispatch(MemoAction::SetWorkingFolder(folder));
    }

    pub fn set_memos(&self, memos: Vec<MemoMeta>) {
        self.dispatch(MemoAction::SetMemos(memos));
    }

    pub fn select_memo(&self, path: Option<String>) {
        self.dispatch(MemoAction::SelectMemo(path));
    }

    pub fn set_current_memo(&self, memo: Option<MemoFile>) {
        self.dispatch(MemoAction::SetCurrentMemo(memo));
    }

    /// 返回内容是否真的发生了变化
    pub fn update_content(&self, content: impl Into<String>) -> bool {
        self.dispatch(MemoAction::UpdateContent(content.into()))
    }

    /// 来自编辑器实例 `path` 的修改；实例已过期时丢弃
    pub fn edit_content(&self, path: &str, content: impl Into<String>) -> bool {
        self.dispatch(MemoAction::EditContent {
            path: path.to_string(),
            content: content.into(),
        })
    }

    pub fn mark_as_saved(&self) {
        self.dispatch(MemoAction::MarkAsSaved);
    }

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(MemoAction::SetLoading(loading));
    }

    pub fn add_memo(&self, meta: MemoMeta) {
        self.dispatch(MemoAction::AddMemo(meta));
    }

    pub fn remove_memo(&self, path: &str) {
        self.dispatch(MemoAction::RemoveMemo(path.to_string()));
    }

    pub fn update_memo_meta(&self, path: &str, patch: impl Into<MemoMetaPatch>) {
        self.dispatch(MemoAction::UpdateMemoMeta {
            path: path.to_string(),
            patch: patch.into(),
        });
    }

    pub fn rename_memo(&self, old_path: &str, meta: MemoMeta) {
        self.dispatch(MemoAction::RenameMemo {
            old_path: old_path.to_string(),
            meta,
        });
    }

    /// 清空选中项和当前备忘录
    pub fn clear_selection(&self) {
        self.select_memo(None);
        self.set_current_memo(None);
    }

    pub fn working_folder(&self) -> Option<String> {
        self.with(|s| s.working_folder.clone())
    }

    pub fn selected_memo_path(&self) -> Option<String> {
        self.with(|s| s.selected_memo_path.clone())
    }

    /// 当前备忘录的 (path, content)
    pub fn current(&self) -> Option<(String, String)> {
        self.with(|s| {
            s.current_memo
                .as_ref()
                .map(|m| (m.path().to_string(), m.content.clone()))
        })
    }

    pub fn session(&self) -> PersistedSession {
        self.with(MemoState::session)
    }
}
