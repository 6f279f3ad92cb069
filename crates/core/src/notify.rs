//! User-facing notifications raised by the response interceptor

use std::time::Duration;

/// A transient, auto-dismissing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
    /// Swallow clicks on the page while the message is shown
    pub forbid_click: bool,
}

impl Notification {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration,
            forbid_click: true,
        }
    }
}

/// Presents notifications; rendering is up to the view layer
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only logs, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            message = %notification.message,
            duration_ms = notification.duration.as_millis(),
            "Notification"
        );
    }
}
