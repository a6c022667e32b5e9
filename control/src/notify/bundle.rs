//! Notification values and display sinks

use std::time::Duration;

use tokio::sync::mpsc;

/// Severity or category for user-visible notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral progress message
    Info,
    /// Successful terminal outcome
    Success,
    /// Failed or canceled outcome
    Error,
}

/// One notification, ready for whatever surface displays it.
///
/// Has no identity beyond the moment it is pushed; the control creates a
/// fresh bundle on every status observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationBundle {
    /// Headline text
    pub title: String,

    /// Visual treatment
    pub severity: Severity,

    /// How long the notification stays up
    pub duration: Duration,

    /// Whether the user can close it early
    pub dismissible: bool,

    /// Optional supporting line
    pub description: Option<String>,
}

/// Display surface for notifications, supplied by the host
pub trait NotificationSink: Send + Sync {
    /// Push one notification
    fn push(&self, bundle: NotificationBundle);
}

/// Sink that writes notifications to the log
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn push(&self, bundle: NotificationBundle) {
        match bundle.severity {
            Severity::Error => tracing::error!(title = %bundle.title, "notification"),
            _ => tracing::info!(title = %bundle.title, "notification"),
        }
    }
}

/// Sink that forwards notifications over a channel to a host UI
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationBundle>,
}

impl ChannelSink {
    /// Create a sink and the receiving end the host consumes
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationBundle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn push(&self, bundle: NotificationBundle) {
        // A host that dropped its receiver simply stops seeing notifications.
        let _ = self.tx.send(bundle);
    }
}
