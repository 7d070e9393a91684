//! Notification formatting.

use meeshoguard_core::{Notification, NotificationKind};

/// One-line rendering of a notification.
pub fn format_notice(notice: &Notification) -> String {
    let marker = match notice.kind {
        NotificationKind::Info => "✓",
        NotificationKind::Error => "✗",
    };
    format!("{marker} {}: {}", notice.title, notice.message)
}
