// libs/scheduling-cell/src/notifications.rs
//
// One-way reminder/change sink. Delivery is best-effort and off the
// booking critical path: a sink failure never rolls back a committed
// appointment mutation.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Booked,
    Rescheduled,
    Cancelled,
    Reminder,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: Notification);
}

/// Default sink: structured log lines. A real deployment substitutes a
/// push/email transport behind the same trait.
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(&self, notification: Notification) {
        info!(
            kind = ?notification.kind,
            title = %notification.title,
            "{}",
            notification.message
        );
    }
}
