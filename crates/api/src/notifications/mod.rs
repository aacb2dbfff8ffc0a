//! Pending notices shown to the operator.
//!
//! Handlers and the error path push notices onto a per-provider channel. The
//! `/notifications` routes are the single consumer: the UI renders the front
//! notice and dismisses it, so notices surface in the order they were raised.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use fila_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Notices kept per channel before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    pub created_at: Timestamp,
}

/// Notice attached to a response, recorded once the response is produced.
#[derive(Debug, Clone)]
pub struct PendingNotice {
    pub kind: NoticeKind,
    pub message: String,
}

/// FIFO notice queues keyed by channel.
///
/// Thread-safe via interior `RwLock`; shared across the application in an
/// `Arc`.
pub struct NotificationCenter {
    channels: RwLock<HashMap<String, VecDeque<Notice>>>,
    capacity: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Append a notice at the back of `channel`, dropping the oldest one when
    /// the channel is full.
    pub async fn enqueue(&self, channel: &str, kind: NoticeKind, message: impl Into<String>) -> Notice {
        let notice = Notice {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
        };

        let mut channels = self.channels.write().await;
        let queue = channels.entry(channel.to_string()).or_default();
        if queue.len() >= self.capacity {
            if let Some(dropped) = queue.pop_front() {
                tracing::debug!(channel, notice_id = %dropped.id, "Dropping oldest notice");
            }
        }
        queue.push_back(notice.clone());
        notice
    }

    /// The notice the UI should display next.
    pub async fn front(&self, channel: &str) -> Option<Notice> {
        self.channels
            .read()
            .await
            .get(channel)
            .and_then(|q| q.front().cloned())
    }

    /// All pending notices, oldest first.
    pub async fn pending(&self, channel: &str) -> Vec<Notice> {
        self.channels
            .read()
            .await
            .get(channel)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove and return the front notice.
    pub async fn dismiss_front(&self, channel: &str) -> Option<Notice> {
        let mut channels = self.channels.write().await;
        let queue = channels.get_mut(channel)?;
        let notice = queue.pop_front();
        if queue.is_empty() {
            channels.remove(channel);
        }
        notice
    }

    /// Drop every pending notice of `channel`, returning how many were removed.
    pub async fn clear(&self, channel: &str) -> usize {
        self.channels
            .write()
            .await
            .remove(channel)
            .map(|q| q.len())
            .unwrap_or(0)
    }
}
