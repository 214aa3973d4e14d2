//! User-facing notifications
//!
//! The bootstrap flow describes what to tell the user as [`Notification`]
//! values and hands them to a [`NotificationSink`]. How (and whether) they are
//! drawn is up to the sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::constants::notifications;

/// How loudly a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Emphasized prefix (rendered bold), e.g. `ERROR: `
    pub emphasis: Option<String>,
    /// Message body
    pub message: String,
    /// Presentation severity
    pub severity: Severity,
    /// Minimum time the notification stays visible
    pub min_duration: Option<Duration>,
}

impl Notification {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            emphasis: None,
            message: message.into(),
            severity,
            min_duration: None,
        }
    }

    /// Informational notification
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Info)
    }

    /// Warning notification
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Warning)
    }

    /// Error notification
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    /// Long-lived error with an emphasized `ERROR: ` prefix, used for
    /// rejected form submissions
    pub fn prominent_error(message: impl Into<String>) -> Self {
        let mut notification =
            Self::error(message).with_min_duration(notifications::ERROR_MIN_DURATION);
        notification.emphasis = Some(notifications::ERROR_PREFIX.to_string());
        notification
    }

    /// Override the minimum display duration
    pub fn with_min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = Some(duration);
        self
    }

    /// Display duration: `default`, extended to the minimum if one was requested
    pub fn display_duration(&self, default: Duration) -> Duration {
        self.min_duration.map_or(default, |min| min.max(default))
    }

    /// Plain text including the emphasized prefix
    pub fn text(&self) -> String {
        match &self.emphasis {
            Some(prefix) => format!("{}{}", prefix, self.message),
            None => self.message.clone(),
        }
    }
}

/// Surfaces notifications to the user. Must not block.
pub trait NotificationSink: Send + Sync {
    /// Show a notification (fire-and-forget)
    fn show(&self, notification: Notification);
}

impl<N: NotificationSink + ?Sized> NotificationSink for Arc<N> {
    fn show(&self, notification: Notification) {
        (**self).show(notification)
    }
}

/// Sink forwarding notifications over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    /// Creates a sink and the receiver draining it
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn show(&self, notification: Notification) {
        tracing::debug!("Notification: {}", notification.text());
        if self.sender.send(notification).is_err() {
            tracing::warn!("Notification dropped: receiver is gone");
        }
    }
}
