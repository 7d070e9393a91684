//! Notification sink port.
//!
//! Fire-and-forget delivery of user-facing notices. The upload core calls
//! `notify` and never waits for acknowledgement.

use crate::upload::Notification;

/// Port for surfacing notifications to the user.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSinkPort: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Discards every notification.
#[derive(Debug, Clone, Default)]
pub struct NoopNotificationSink;

impl NoopNotificationSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSinkPort for NoopNotificationSink {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::NotificationKind;
    use mockall::predicate::function;

    #[test]
    fn test_mock_sink_receives_notification() {
        let mut sink = MockNotificationSinkPort::new();
        sink.expect_notify()
            .with(function(|n: &Notification| {
                n.kind == NotificationKind::Info && n.title == "Processing Complete"
            }))
            .times(1)
            .return_const(());

        sink.notify(Notification::processing_complete("a.pdf", 5));
    }

    #[test]
    fn test_noop_sink() {
        NoopNotificationSink::new().notify(Notification::info("t", "m"));
    }
}
