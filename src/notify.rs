//! User-facing notifications for failed (or finished) mutations.

use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};

/// Toast-style notification sink owned by the UI layer.
pub trait Notifier: Send + Sync {
    /// Report a failure: a short title plus the reason.
    fn error(&self, title: &str, description: &str);

    /// Report a success. Ignored unless the notifier cares.
    fn success(&self, _title: &str) {}
}

/// Notifier that writes to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, title: &str, description: &str) {
        warn!("{}: {}", title, description);
    }

    fn success(&self, title: &str) {
        info!("{}", title);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Success,
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
}

/// Notifier that keeps every notification in memory, e.g. to render a
/// toast list or to assert on in tests. Clone-friendly via Arc.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the error notifications.
    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect()
    }

    /// Drop every recorded notification.
    pub fn clear(&self) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, description: &str) {
        self.push(Notification {
            level: NotificationLevel::Error,
            title: title.to_string(),
            description: Some(description.to_string()),
        });
    }

    fn success(&self, title: &str) {
        self.push(Notification {
            level: NotificationLevel::Success,
            title: title.to_string(),
            description: None,
        });
    }
}
