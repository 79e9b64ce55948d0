use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::MemoController;
use crate::config::SaveMode;

/// 保存动作的落点（通常是 `MemoController`）
#[async_trait]
pub trait SaveTarget: Send + Sync {
    async fn save(&self, path: &str, content: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    /// 没有活动备忘录
    Reset,
    /// 换了一篇备忘录，新内容视为已持久化
    Switched,
    /// 与上次观察到的内容相同
    Same,
    /// 回到了最后一次持久化的内容
    Clean,
    Changed,
}

#[async_trait]
impl SaveTarget for MemoController {
    async fn save(&self, path: &str, content: &str) -> Result<()> {
        self.save_memo(path, content).await.map(|_| ())
    }
}

/// 活动备忘录的内容快照
#[derive(Debug, Default)]
struct Snapshot {
    path: Option<String>,
    content: String,
    last_saved: String,
}

impl Snapshot {
    fn observe(&mut self, path: Option<&str>, content: &str) -> Observed {
        let Some(path) = path else {
            *self = Self::default();
            return Observed::Reset;
        };

        if self.path.as_deref() != Some(path) {
            self.path = Some(path.to_string());
            self.content = content.to_string();
            self.last_saved = content.to_string();
            return Observed::Switched;
        }

        if self.content == content {
            return Observed::Same;
        }
        self.content = content.to_string();

        if self.content == self.last_saved {
            Observed::Clean
        } else {
            Observed::Changed
        }
    }

    /// 尚未持久化的 (path, content)
    fn pending(&self) -> Option<(String, String)> {
        let path = self.path.as_ref()?;
        (self.content != self.last_saved).then(|| (path.clone(), self.content.clone()))
    }
}

/// 串行化的持久化执行者
struct Persister {
    target: Arc<dyn SaveTarget>,
    snapshot: Mutex<Snapshot>,
    gate: tokio::sync::Mutex<()>,
}

impl Persister {
    fn new(target: Arc<dyn SaveTarget>) -> Self {
        Self {
            target,
            snapshot: Mutex::new(Snapshot::default()),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    fn snapshot(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 保存未持久化的内容；内容与上次保存一致时跳过
    async fn persist_pending(&self) -> Result<bool> {
        let _gate = self.gate.lock().await;

        let pending = self.snapshot().pending();
        let Some((path, content)) = pending else {
            return Ok(false);
        };
        self.target.save(&path, &content).await?;

        let mut snapshot = self.snapshot();
        if snapshot.path.as_deref() == Some(path.as_str()) {
            snapshot.last_saved = content;
        }
        Ok(true)
    }

    async fn pause(&self) -> SavePause<'_> {
        SavePause {
            _gate: self.gate.lock().await,
        }
    }
}

/// 持有期间不会有任何保存写入宿主
#[must_use]
pub struct SavePause<'a> {
    _gate: tokio::sync::MutexGuard<'a, ()>,
}

/// 显式保存
pub struct ManualSaver {
    persister: Persister,
}

impl ManualSaver {
    pub fn new(target: Arc<dyn SaveTarget>) -> Self {
        Self {
            persister: Persister::new(target),
        }
    }

    pub fn observe(&self, path: Option<&str>, content: &str) {
        self.persister.snapshot().observe(path, content);
    }

    /// 返回是否真的调用了保存
    pub async fn save_now(&self) -> Result<bool> {
        self.persister.persist_pending().await
    }
}

struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerSlot {
    current: Option<Timer>,
    generation: u64,
}

/// 防抖自动保存
///
/// 每次内容变化都会重新计时；`delay` 内没有新变化才保存最新内容。
/// 路径变化或变为空时取消计时。已经开始执行的保存不会被中断。
pub struct AutoSaver {
    persister: Arc<Persister>,
    delay: Duration,
    timer: Arc<Mutex<TimerSlot>>,
}

impl AutoSaver {
    pub fn new(target: Arc<dyn SaveTarget>, delay: Duration) -> Self {
        Self {
            persister: Arc::new(Persister::new(target)),
            delay,
            timer: Arc::new(Mutex::new(TimerSlot::default())),
        }
    }

    pub fn observe(&self, path: Option<&str>, content: &str) {
        let (observed, pending) = {
            let mut snapshot = self.persister.snapshot();
            let observed = snapshot.observe(path, content);
            (observed, snapshot.pending().is_some())
        };
        match observed {
            // 计时被暂停打断后重新安排
            Observed::Same if pending && !self.is_scheduled() => self.restart(),
            Observed::Same => {}
            Observed::Reset | Observed::Switched | Observed::Clean => self.cancel(),
            Observed::Changed => self.restart(),
        }
    }

    /// 立即保存挂起的内容并取消计时
    pub async fn flush(&self) -> Result<bool> {
        self.cancel();
        self.persister.persist_pending().await
    }

    pub fn is_scheduled(&self) -> bool {
        lock_slot(&self.timer).current.is_some()
    }

    fn cancel(&self) {
        if let Some(timer) = lock_slot(&self.timer).current.take() {
            timer.handle.abort();
        }
    }

    fn restart(&self) {
        let mut slot = lock_slot(&self.timer);
        if let Some(timer) = slot.current.take() {
            timer.handle.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        let persister = Arc::clone(&self.persister);
        let timers = Arc::clone(&self.timer);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                // 从这里开始不可再被取消
                let mut slot = lock_slot(&timers);
                match slot.current.as_ref() {
                    Some(timer) if timer.generation == generation => {
                        slot.current.take();
                    }
                    _ => return,
                }
            }
            if let Err(e) = persister.persist_pending().await {
                tracing::warn!("Autosave failed: {:#}", e);
            }
        });

        slot.current = Some(Timer { generation, handle });
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock_slot(slot: &Mutex<TimerSlot>) -> MutexGuard<'_, TimerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 按配置选择的保存策略
pub enum SaveCoordinator {
    Auto(AutoSaver),
    Manual(ManualSaver),
}

impl SaveCoordinator {
    pub fn new(mode: SaveMode, delay: Duration, target: Arc<dyn SaveTarget>) -> Self {
        match mode {
            SaveMode::Auto => Self::Auto(AutoSaver::new(target, delay)),
            SaveMode::Manual => Self::Manual(ManualSaver::new(target)),
        }
    }

    pub fn mode(&self) -> SaveMode {
        match self {
            Self::Auto(_) => SaveMode::Auto,
            Self::Manual(_) => SaveMode::Manual,
        }
    }

    /// 每次活动备忘录的路径或内容变化后调用
    pub fn observe(&self, path: Option<&str>, content: &str) {
        match self {
            Self::Auto(saver) => saver.observe(path, content),
            Self::Manual(saver) => saver.observe(path, content),
        }
    }

    /// 显式保存（快捷键 / 保存命令）
    pub async fn save_now(&self) -> Result<bool> {
        match self {
            Self::Auto(saver) => saver.flush().await,
            Self::Manual(saver) => saver.save_now().await,
        }
    }

    /// 切换前把未保存的内容写回
    pub async fn flush(&self) -> Result<bool> {
        self.save_now().await
    }

    /// 取消计时并等待进行中的保存结束；返回的 guard 释放前不会再保存
    pub async fn pause(&self) -> SavePause<'_> {
        match self {
            Self::Auto(saver) => {
                saver.cancel();
                saver.persister.pause().await
            }
            Self::Manual(saver) => saver.persister.pause().await,
        }
    }

    pub fn has_pending(&self) -> bool {
        let persister = match self {
            Self::Auto(saver) => saver.persister.as_ref(),
            Self::Manual(saver) => &saver.persister,
        };
        persister.snapshot().pending().is_some()
    }
}
