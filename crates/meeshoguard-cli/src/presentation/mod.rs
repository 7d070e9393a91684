//! Terminal rendering of the upload queue and notifications.

pub mod notices;
pub mod progress;

pub use notices::format_notice;
pub use progress::QueueProgressPrinter;
