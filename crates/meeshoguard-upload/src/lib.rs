//! Upload queue, progress simulation, and orchestration for the MeeshoGuard
//! label uploader.
//!
//! - `queue` - pure state machine over the ordered entry list
//! - `progress` - phase accumulators and increment sources
//! - `simulator` - timer-driven two-phase worker
//! - `manager` - `UploadManager`, the orchestrator adapters talk to
//! - `emitters` - channel-backed port implementations

// Re-export core types for convenience
pub use meeshoguard_core::upload::{
    AdmissionReport, FileDescriptor, Notification, NotificationKind, Phase, UploadEntry,
    UploadError, UploadEvent, UploadId, UploadStatus,
};
pub use meeshoguard_core::{
    NotificationSinkPort, ProgressSource, UploadEventEmitterPort, UploaderSettings,
};

pub mod emitters;
pub mod progress;
pub mod queue;
pub mod simulator;

mod manager;

pub use emitters::{BroadcastUploadEmitter, ChannelNotificationSink};
pub use manager::{UploadManager, UploadManagerDeps, build_upload_manager};
pub use progress::{RandomProgressSource, SequenceProgressSource};
pub use queue::{AdmissionPolicy, UploadQueue};
pub use simulator::{ProgressSimulator, SimulationJob, SimulationSink};
