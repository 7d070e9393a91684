//! Upload event emitter port.
//!
//! This port abstracts upload event emission, allowing the upload manager
//! to publish changes without coupling to a transport (channels, terminal
//! renderers, web sockets).

use crate::upload::UploadEvent;

/// Port for emitting upload events.
///
/// # Example
///
/// ```ignore
/// fn on_progress(&self, emitter: &dyn UploadEventEmitterPort) {
///     emitter.emit(UploadEvent::progress(id, UploadStatus::Uploading, 42.0));
/// }
/// ```
pub trait UploadEventEmitterPort: Send + Sync {
    /// Emit an upload event.
    ///
    /// This method should not block.
    fn emit(&self, event: UploadEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort>;
}

/// A no-op upload event emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopUploadEmitter;

impl NoopUploadEmitter {
    /// Create a new no-op upload emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl UploadEventEmitterPort for NoopUploadEmitter {
    fn emit(&self, _event: UploadEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}
