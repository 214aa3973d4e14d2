//! On-screen notification queue
//!
//! Notifications arrive from the bootstrap through a channel and stay on
//! screen for their display duration. Only the newest few are drawn; older
//! ones keep their own expiry and reappear if space frees up before it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::app::Notification;
use crate::constants::notifications;

/// A notification with its expiry time
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// Notifications currently shown, oldest first
#[derive(Debug)]
pub struct NotificationQueue {
    toasts: VecDeque<Toast>,
    default_duration: Duration,
    max_visible: usize,
}

impl NotificationQueue {
    /// Queue whose notifications stay `default_duration` unless they ask for longer
    pub fn new(default_duration: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            default_duration,
            max_visible: notifications::MAX_VISIBLE,
        }
    }

    /// Add a notification shown from `now`
    pub fn push(&mut self, notification: Notification, now: Instant) {
        let expires_at = now + notification.display_duration(self.default_duration);
        self.toasts.push_back(Toast {
            notification,
            expires_at,
        });
    }

    /// Move every pending notification from the channel into the queue
    pub fn drain(&mut self, receiver: &mut mpsc::UnboundedReceiver<Notification>, now: Instant) {
        while let Ok(notification) = receiver.try_recv() {
            self.push(notification, now);
        }
    }

    /// Drop expired notifications; returns whether anything was removed
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        before != self.toasts.len()
    }

    /// Notifications to draw, oldest first
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        let skip = self.toasts.len().saturating_sub(self.max_visible);
        self.toasts.iter().skip(skip).map(|toast| &toast.notification)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
