//! In-process notification relay backed by a `tokio::sync::broadcast` channel.
//!
//! Views publish [`Notification`]s through [`NotificationRelay::notify`];
//! the application shell subscribes and renders them as toasts. The relay
//! is shared via `Arc<NotificationRelay>`.

use andon_core::notification::{Notification, Severity};
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fire-and-forget fan-out of notifications to the shell.
///
/// # Usage
///
/// ```rust
/// use andon_core::notification::Severity;
/// use andon_events::relay::NotificationRelay;
///
/// let relay = NotificationRelay::default();
/// let mut rx = relay.subscribe();
///
/// relay.notify("Site has been added.", Severity::Info, 5);
/// ```
pub struct NotificationRelay {
    sender: broadcast::Sender<Notification>,
}

impl NotificationRelay {
    /// Create a relay with a specific channel capacity.
    ///
    /// When the buffer is full the oldest undisplayed notifications are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification to every subscribed shell.
    ///
    /// With no subscribers the notification is dropped.
    pub fn notify(&self, message: impl Into<String>, severity: Severity, duration_secs: u32) {
        let notification = Notification::new(message, severity, duration_secs);
        tracing::debug!(
            severity = %notification.severity,
            message = %notification.message,
            "Notification"
        );
        // A SendError only means nobody is listening.
        let _ = self.sender.send(notification);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationRelay {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_reaches_subscriber() {
        let relay = NotificationRelay::default();
        let mut rx = relay.subscribe();

        relay.notify("Site has been deleted.", Severity::Success, 5);

        let received = rx.recv().await.expect("should receive the notification");
        assert_eq!(received.message, "Site has been deleted.");
        assert_eq!(received.severity, Severity::Success);
        assert_eq!(received.duration_secs, 5);
    }

    #[tokio::test]
    async fn every_subscriber_receives_each_notification() {
        let relay = NotificationRelay::default();
        let mut rx1 = relay.subscribe();
        let mut rx2 = relay.subscribe();

        relay.notify("hello", Severity::Info, 3);

        assert_eq!(rx1.recv().await.unwrap().message, "hello");
        assert_eq!(rx2.recv().await.unwrap().message, "hello");
    }

    #[test]
    fn notify_without_subscribers_does_not_panic() {
        let relay = NotificationRelay::default();
        relay.notify("nobody listening", Severity::Warning, 5);
    }

    #[test]
    fn try_recv_sees_queued_notifications_in_order() {
        let relay = NotificationRelay::new(4);
        let mut rx = relay.subscribe();
        relay.notify("first", Severity::Info, 5);
        relay.notify("second", Severity::Error, 5);

        assert_eq!(rx.try_recv().unwrap().message, "first");
        assert_eq!(rx.try_recv().unwrap().message, "second");
        assert!(rx.try_recv().is_err());
    }
}
