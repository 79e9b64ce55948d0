use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// 提示默认显示时长
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
            Self::Info => f.write_str("info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
}

/// 全局提示队列
///
/// 插入顺序即显示顺序，消息之间不合并；每条消息在超时后自动移除，
/// 也可以被用户提前关闭。
#[derive(Clone)]
pub struct ToastQueue {
    tx: Arc<watch::Sender<Vec<Toast>>>,
    /// 出现过的错误数，不随消息过期或关闭减少
    errors: Arc<AtomicUsize>,
    timeout: Duration,
}

impl ToastQueue {
    pub fn new(timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            tx: Arc::new(tx),
            errors: Arc::new(AtomicUsize::new(0)),
            timeout,
        }
    }

    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> String {
        let toast = Toast {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
        };
        let id = toast.id.clone();
        if kind == ToastKind::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.tx.send_modify(|toasts| toasts.push(toast));
        self.schedule_expiry(id.clone());
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.push(message, ToastKind::Info)
    }

    /// 手动关闭；返回该消息是否仍在队列中
    pub fn dismiss(&self, id: &str) -> bool {
        self.tx.send_if_modified(|toasts| {
            let before = toasts.len();
            toasts.retain(|t| t.id != id);
            toasts.len() != before
        })
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.tx.borrow().clone()
    }

    /// 取出并清空全部消息
    pub fn drain(&self) -> Vec<Toast> {
        let mut drained = Vec::new();
        self.tx.send_if_modified(|toasts| {
            drained = std::mem::take(toasts);
            !drained.is_empty()
        });
        drained
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.tx.subscribe()
    }

    fn schedule_expiry(&self, id: String) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime available, toast {} will not auto-expire", id);
            return;
        };

        let tx = Arc::downgrade(&self.tx);
        let timeout = self.timeout;
        handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(tx) = tx.upgrade() {
                tx.send_if_modified(|toasts| {
                    let before = toasts.len();
                    toasts.retain(|t| t.id != id);
                    toasts.len() != before
                });
            }
        });
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(queue: &ToastQueue) -> Vec<String> {
        queue.toasts().into_iter().map(|t| t.message).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_keep_insertion_order_and_expire() {
        let queue = ToastQueue::default();
        queue.info("first");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        queue.error("second");
        queue.error("second");

        assert_eq!(messages(&queue), vec!["first", "second", "second"]);

        tokio::time::sleep(Duration::from_millis(3001)).await;
        assert_eq!(messages(&queue), vec!["second", "second"]);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_single_toast() {
        let queue = ToastQueue::default();
        let first = queue.success("saved");
        queue.info("other");

        assert!(queue.dismiss(&first));
        assert!(!queue.dismiss(&first));
        assert_eq!(messages(&queue), vec!["other"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_count_outlives_expired_toasts() {
        let queue = ToastQueue::new(Duration::from_millis(100));
        queue.error("failed");
        queue.info("note");
        let id = queue.error("again");
        queue.dismiss(&id);

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert!(queue.toasts().is_empty());
        assert!(queue.drain().is_empty());
        assert_eq!(queue.error_count(), 2);
    }

    #[tokio::test]
    async fn test_drain_empties_queue() {
        let queue = ToastQueue::new(Duration::from_secs(60));
        queue.info("a");
        queue.error("b");

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, ToastKind::Error);
        assert!(queue.toasts().is_empty());
    }

    #[test]
    fn test_push_without_runtime() {
        let queue = ToastQueue::default();
        queue.info("no runtime");
        assert_eq!(messages(&queue), vec!["no runtime"]);
    }
}
