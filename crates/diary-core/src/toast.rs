//! Transient user notifications.
//!
//! A [`ToastChannel`] holds at most one message. Publishing replaces the
//! current message, and each message clears itself after the channel's
//! display duration unless something newer has been published since.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// How long a toast stays visible unless replaced or cleared.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2_000);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        };
        f.write_str(label)
    }
}

/// A published notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    /// Publication sequence number, unique per channel.
    pub id: u64,
}

#[derive(Debug)]
struct ToastInner {
    sender: watch::Sender<Option<Toast>>,
    next_id: AtomicU64,
    duration: Duration,
}

/// Injectable single-slot notification channel. Clones share the slot.
#[derive(Debug, Clone)]
pub struct ToastChannel {
    inner: Arc<ToastInner>,
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastChannel {
    pub fn new(duration: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(ToastInner {
                sender,
                next_id: AtomicU64::new(1),
                duration,
            }),
        }
    }

    /// Display duration of each message.
    pub fn duration(&self) -> Duration {
        self.inner.duration
    }

    /// Publish a message, replacing any current one, and return it.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> Toast {
        let toast = Toast {
            message: message.into(),
            kind,
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
        };
        self.inner.sender.send_replace(Some(toast.clone()));
        self.schedule_clear(toast.id);
        toast
    }

    pub fn success(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> Toast {
        self.show(message, ToastKind::Info)
    }

    /// Drop the current message, if any.
    pub fn clear(&self) {
        self.inner.sender.send_if_modified(|current| current.take().is_some());
    }

    /// Message currently displayed.
    pub fn current(&self) -> Option<Toast> {
        self.inner.sender.borrow().clone()
    }

    /// Receiver notified on every publish and clear.
    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.inner.sender.subscribe()
    }

    fn schedule_clear(&self, id: u64) {
        // Without a runtime the message stays until replaced or cleared.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let inner: Weak<ToastInner> = Arc::downgrade(&self.inner);
        let duration = self.inner.duration;
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = inner.upgrade() {
                inner.sender.send_if_modified(|current| {
                    if current.as_ref().is_some_and(|toast| toast.id == id) {
                        *current = None;
                        true
                    } else {
                        false
                    }
                });
            }
        });
    }
}
