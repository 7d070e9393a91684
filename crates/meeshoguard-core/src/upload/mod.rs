//! Upload domain types, events, errors, and notifications.
//!
//! This module contains pure data types for the label upload lifecycle.
//! No I/O, timers, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Identifiers and entries (`UploadId`, `UploadEntry`, `UploadStatus`, `Phase`)
//! - `events` - Change events for presentation layers (`UploadEvent`, `AdmissionReport`)
//! - `errors` - Error types for upload operations
//! - `notification` - User-facing notices (`Notification`, `NotificationKind`)

pub mod errors;
pub mod events;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use errors::UploadError;
pub use events::{AdmissionReport, UploadEvent};
pub use notification::{Notification, NotificationKind};
pub use types::{
    FileDescriptor, PDF_MEDIA_TYPE, PROGRESS_COMPLETE, Phase, UploadEntry, UploadId, UploadStatus,
};
