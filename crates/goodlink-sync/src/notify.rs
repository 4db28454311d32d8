//! # Notifications
//!
//! User-visible toasts raised by the engine ("Inventory sync completed",
//! "Retry failed for GL-002 on OTTO", ...) are handed to a [`Notifier`].
//! The engine never waits on delivery.

#[cfg(test)]
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{debug, error, info};

use goodlink_core::{Notification, NotificationLevel};

/// Receiver of engine notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notification: Notification) {}
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let description = notification.description.as_deref().unwrap_or("");
        match notification.level {
            NotificationLevel::Info | NotificationLevel::Success => {
                info!(title = %notification.title, description, "notification")
            }
            NotificationLevel::Error => {
                error!(title = %notification.title, description, "notification")
            }
        }
    }
}

/// Fans notifications out to any number of subscribers.
///
/// Sending with no live subscriber is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        BroadcastNotifier { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            debug!("No notification subscribers");
        }
    }
}

/// Keeps every notification in memory, for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscriber() {
        let notifier = BroadcastNotifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.notify(Notification::success("Inventory sync completed"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.level, NotificationLevel::Success);
        assert_eq!(received.title, "Inventory sync completed");
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let notifier = BroadcastNotifier::default();
        notifier.notify(Notification::info("nobody listening"));
    }

    #[test]
    fn test_recording_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::info("first"));
        notifier.notify(Notification::error("second").with_description("details"));

        assert_eq!(notifier.titles(), vec!["first", "second"]);
        assert_eq!(
            notifier.notifications()[1].description.as_deref(),
            Some("details")
        );
    }
}
