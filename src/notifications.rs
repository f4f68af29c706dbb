//! Self-expiring notification queue
//!
//! Every queued notification gets its own expiry task. The task's abort
//! handle is kept so an early dismissal, or tearing the whole queue down,
//! cancels the timer instead of letting it fire on a dead entry.

use crate::types::{DashboardEvent, Notification};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::AbortHandle;
use tokio::time::sleep;
use uuid::Uuid;

struct QueueInner {
    entries: RwLock<Vec<Notification>>,
    timers: Mutex<HashMap<Uuid, AbortHandle>>,
    ttl: Duration,
    events: broadcast::Sender<DashboardEvent>,
}

impl QueueInner {
    /// Removes an entry, returning true if it was still queued
    async fn remove_entry(&self, id: Uuid) -> bool {
        let removed = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        };

        if removed {
            let _ = self.events.send(DashboardEvent::notification_removed(id));
        }
        removed
    }

    fn take_timer(&self, id: Uuid) -> Option<AbortHandle> {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
    }
}

/// Queue of transient user-facing messages
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

impl NotificationQueue {
    /// Creates a queue whose entries expire after `ttl`
    pub fn new(ttl: Duration, events: broadcast::Sender<DashboardEvent>) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                entries: RwLock::new(Vec::new()),
                timers: Mutex::new(HashMap::new()),
                ttl,
                events,
            }),
        }
    }

    /// Appends a notification and schedules its expiry
    ///
    /// Must be called from within a tokio runtime.
    pub async fn push(&self, notification: Notification) -> Uuid {
        let id = notification.id;

        self.inner.entries.write().await.push(notification.clone());
        let _ = self
            .inner
            .events
            .send(DashboardEvent::notification_added(notification));

        // Hold the timer map while spawning so the task cannot look up its
        // own handle before it has been inserted.
        let mut timers = self.inner.timers.lock().unwrap_or_else(|e| e.into_inner());
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            sleep(inner.ttl).await;
            inner.take_timer(id);
            if inner.remove_entry(id).await {
                tracing::debug!(notification_id = %id, "Notification expired");
            }
        });
        timers.insert(id, handle.abort_handle());

        id
    }

    /// Removes a notification before it expires
    ///
    /// Returns false if it was already gone.
    pub async fn dismiss(&self, id: Uuid) -> bool {
        if let Some(timer) = self.inner.take_timer(id) {
            timer.abort();
        }
        self.inner.remove_entry(id).await
    }

    /// Current notifications, oldest first
    pub async fn list(&self) -> Vec<Notification> {
        self.inner.entries.read().await.clone()
    }

    /// Number of expiry timers still scheduled
    pub fn pending_timers(&self) -> usize {
        self.inner
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Cancels every expiry timer
    ///
    /// Entries stay readable; nothing will remove them any more.
    pub fn cancel_timers(&self) {
        let mut timers = self.inner.timers.lock().unwrap_or_else(|e| e.into_inner());
        for (_, timer) in timers.drain() {
            timer.abort();
        }
    }
}
