//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces the upload core expects from its
//! surroundings. They contain no implementation details and use only domain
//! types.

pub mod notification_sink;
pub mod progress_source;
pub mod upload_event_emitter;

pub use notification_sink::{NoopNotificationSink, NotificationSinkPort};
pub use progress_source::ProgressSource;
pub use upload_event_emitter::{NoopUploadEmitter, UploadEventEmitterPort};
