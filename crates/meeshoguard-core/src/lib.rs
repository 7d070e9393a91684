//! Core domain types and ports for the MeeshoGuard label uploader.
//!
//! - `upload` - entries, statuses, events, errors, notifications
//! - `ports` - emitter, notification sink, and progress source traits
//! - `settings` - simulation settings and validation
//! - `utils` - presentation helpers shared by adapters

pub mod ports;
pub mod settings;
pub mod upload;
pub mod utils;

// Re-export commonly used types for convenience
pub use ports::{
    NoopNotificationSink, NoopUploadEmitter, NotificationSinkPort, ProgressSource,
    UploadEventEmitterPort,
};
pub use settings::{SettingsError, UploaderSettings, validate_settings};
pub use upload::{
    AdmissionReport, FileDescriptor, Notification, NotificationKind, PDF_MEDIA_TYPE,
    PROGRESS_COMPLETE, Phase, UploadEntry, UploadError, UploadEvent, UploadId, UploadStatus,
};
pub use utils::format_file_size;
