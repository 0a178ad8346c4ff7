use crate::events::AppEvent;
use crate::traits::Notifier;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Forwards notices to the UI loop as toasts, and optionally to the desktop.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<AppEvent>,
    desktop: bool,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, desktop: bool) -> Self {
        Self { tx, desktop }
    }

    fn send(&self, level: NoticeLevel, message: &str) {
        if self
            .tx
            .send(AppEvent::Notice {
                level,
                message: message.to_string(),
            })
            .is_err()
        {
            tracing::warn!("notifier: channel closed");
        }
        if self.desktop {
            send_desktop(level, message);
        }
    }
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        self.send(NoticeLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.send(NoticeLevel::Error, message);
    }
}

#[cfg(feature = "desktop-notify")]
pub fn send_desktop(level: NoticeLevel, message: &str) {
    use notify_rust::{Notification, Urgency};

    let (summary, icon, urgency) = match level {
        NoticeLevel::Success => ("Deployment started", "dialog-information", Urgency::Normal),
        NoticeLevel::Error => ("Deployment failed", "dialog-error", Urgency::Critical),
    };

    if let Err(e) = Notification::new()
        .summary(summary)
        .body(message)
        .icon(icon)
        .urgency(urgency)
        .show()
    {
        tracing::debug!("desktop notification failed: {e}");
    }
}

#[cfg(not(feature = "desktop-notify"))]
pub fn send_desktop(_level: NoticeLevel, _message: &str) {}
