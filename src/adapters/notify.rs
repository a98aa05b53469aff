//! User-facing notification channel
//!
//! Notifications are short human-readable messages meant for whoever
//! started the export. Details always go to the log; notifications only
//! point at them.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A single message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Write-only sink for user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Info,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.notify(Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => {
                tracing::info!(notification = %notification.message, "User notification")
            }
            NotificationLevel::Error => {
                tracing::error!(notification = %notification.message, "User notification")
            }
        }
    }
}

/// Buffers notifications so the host can present them after the run
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    // A poisoned lock only means a caller panicked mid-push; the list is intact.
    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn errors(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .map(|n| n.message)
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
