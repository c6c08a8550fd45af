//! Change notification for mailbox inserts.
//!
//! [`MailboxNotifier`] is the in-process stand-in for the backend's
//! insert-subscription channel: sending an email publishes one event per
//! mailbox row created, and any number of open mail views can subscribe.
//! Events are cues to refetch or merge, not an ordered authoritative log;
//! a consumer that lags or misses events is expected to refetch its folder.
//! Dropping the receiver is unsubscription.

use crate::core::mail::MailFolder;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// One new mailbox row, announced after its transaction commits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailboxEvent {
    /// ID of the new mailbox entry
    pub mailbox_id: i64,
    /// ID of the referenced email
    pub email_id: i64,
    /// Identity whose mailbox gained the entry
    pub identity_id: i64,
    /// Folder the entry landed in
    pub folder: MailFolder,
}

/// Broadcast hub for mailbox insert events.
pub struct MailboxNotifier {
    tx: broadcast::Sender<MailboxEvent>,
}

impl MailboxNotifier {
    /// Creates a notifier with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Opens a subscription receiving every event published from now on.
    /// Consumers filter by identity themselves.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MailboxEvent> {
        self.tx.subscribe()
    }

    /// Publishes an event to all current subscribers. Having no subscribers
    /// is not an error; the event is simply dropped.
    pub fn publish(&self, event: MailboxEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for MailboxNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn event(identity_id: i64) -> MailboxEvent {
        MailboxEvent {
            mailbox_id: 1,
            email_id: 1,
            identity_id,
            folder: MailFolder::Inbox,
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let notifier = MailboxNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.publish(event(7));
        assert_eq!(rx.recv().await.unwrap(), event(7));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let notifier = MailboxNotifier::new();
        notifier.publish(event(1));
    }

    #[tokio::test]
    async fn test_subscription_starts_at_subscribe_time() {
        let notifier = MailboxNotifier::new();
        notifier.publish(event(1));

        let mut rx = notifier.subscribe();
        notifier.publish(event(2));

        // Only the event published after subscribing arrives.
        assert_eq!(rx.recv().await.unwrap().identity_id, 2);
        assert!(rx.try_recv().is_err());
    }
}
