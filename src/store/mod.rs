//! 客户端状态容器
//!
//! 状态迁移是纯函数式的 reducer（`Reducer::reduce`），视图失效通过
//! `tokio::sync::watch` 通道广播。没有实际变化的迁移不会通知订阅者。

mod memo;
mod persist;
mod settings;

use std::sync::Arc;
use tokio::sync::watch;

pub use memo::{MemoState, MemoStore};
pub use persist::{PersistedSession, PersistedSettings, StateFile};
pub use settings::{SettingsState, SettingsStore};

/// 纯状态迁移
pub trait Reducer {
    type Action;

    /// 应用动作，返回状态是否发生了变化
    fn reduce(&mut self, action: Self::Action) -> bool;
}

/// 单一状态容器（可廉价克隆，所有克隆共享同一份状态）
pub struct Store<S> {
    tx: Arc<watch::Sender<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<S: Reducer> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// 同步应用一个动作；变化时通知订阅者
    pub fn dispatch(&self, action: S::Action) -> bool {
        self.tx.send_if_modified(|state| state.reduce(action))
    }

    /// 在读锁内访问当前状态
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Reducer + Clone> Store<S> {
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }
}

impl<S: Reducer + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
