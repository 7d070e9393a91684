//! Channel-backed implementations of the emitter and notification ports.
//!
//! Presentation layers subscribe to these instead of implementing the
//! ports themselves.

use tokio::sync::{broadcast, mpsc};

use meeshoguard_core::upload::{Notification, UploadEvent};
use meeshoguard_core::{NotificationSinkPort, UploadEventEmitterPort};

/// Default buffer of the event broadcaster.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Upload event emitter backed by a broadcast channel.
///
/// Every subscriber receives every event emitted after it subscribed.
/// Slow subscribers may miss events if the buffer overflows.
#[derive(Debug, Clone)]
pub struct BroadcastUploadEmitter {
    sender: broadcast::Sender<UploadEvent>,
}

impl BroadcastUploadEmitter {
    /// Create a broadcaster with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastUploadEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl UploadEventEmitterPort for BroadcastUploadEmitter {
    fn emit(&self, event: UploadEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Notification sink that forwards into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    /// Create a sink and the receiver that drains it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSinkPort for ChannelNotificationSink {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!(target: "meeshoguard.upload", "Notification dropped: receiver closed");
        }
    }
}
