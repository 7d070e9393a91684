//! Upload events - discriminated union for all queue state changes.

use serde::{Deserialize, Serialize};

use super::errors::UploadError;
use super::types::{UploadEntry, UploadId, UploadStatus};

/// Single discriminated union for all upload events.
///
/// Presentation layers handle this as a tagged union:
///
/// ```typescript
/// type UploadEvent =
///   | { type: "queue_snapshot"; entries: UploadEntry[] }
///   | { type: "entry_admitted"; entry: UploadEntry }
///   | { type: "progress_updated"; id: string; status: string; progress: number }
///   | { type: "status_changed"; id: string; from: string; to: string; result_count?: number }
///   | { type: "entry_removed"; id: string };
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    /// Snapshot of the entire queue, in insertion order.
    QueueSnapshot {
        /// All entries currently in the queue.
        entries: Vec<UploadEntry>,
    },

    /// A file passed validation and was appended to the queue.
    EntryAdmitted {
        /// The new entry (`uploading`, progress 0).
        entry: UploadEntry,
    },

    /// Progress of the current phase changed.
    ProgressUpdated {
        /// Entry identifier.
        id: UploadId,
        /// Status the entry holds during this phase.
        status: UploadStatus,
        /// New progress value in `[0, 100]`.
        progress: f64,
    },

    /// The entry moved to a new lifecycle status.
    StatusChanged {
        /// Entry identifier.
        id: UploadId,
        /// Previous status.
        from: UploadStatus,
        /// New status.
        to: UploadStatus,
        /// Extracted label count, set when entering `completed`.
        #[serde(skip_serializing_if = "Option::is_none")]
        result_count: Option<u32>,
    },

    /// The entry was removed by the user.
    EntryRemoved {
        /// Entry identifier.
        id: UploadId,
    },
}

impl UploadEvent {
    /// Create a queue snapshot event.
    #[must_use]
    pub const fn queue_snapshot(entries: Vec<UploadEntry>) -> Self {
        Self::QueueSnapshot { entries }
    }

    /// Create an admission event.
    #[must_use]
    pub const fn admitted(entry: UploadEntry) -> Self {
        Self::EntryAdmitted { entry }
    }

    /// Create a progress event.
    #[must_use]
    pub const fn progress(id: UploadId, status: UploadStatus, progress: f64) -> Self {
        Self::ProgressUpdated {
            id,
            status,
            progress,
        }
    }

    /// Create a status change event.
    #[must_use]
    pub const fn status_changed(
        id: UploadId,
        from: UploadStatus,
        to: UploadStatus,
        result_count: Option<u32>,
    ) -> Self {
        Self::StatusChanged {
            id,
            from,
            to,
            result_count,
        }
    }

    /// Create a removal event.
    #[must_use]
    pub const fn removed(id: UploadId) -> Self {
        Self::EntryRemoved { id }
    }

    /// The entry this event concerns, if it concerns exactly one.
    #[must_use]
    pub const fn entry_id(&self) -> Option<&UploadId> {
        match self {
            Self::QueueSnapshot { .. } => None,
            Self::EntryAdmitted { entry } => Some(&entry.id),
            Self::ProgressUpdated { id, .. }
            | Self::StatusChanged { id, .. }
            | Self::EntryRemoved { id } => Some(id),
        }
    }
}

/// Outcome of admitting a batch of files.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdmissionReport {
    /// Entries appended to the queue, in the order the files were given.
    pub admitted: Vec<UploadEntry>,
    /// Validation failures, in the order the files were given.
    pub rejected: Vec<UploadError>,
}

impl AdmissionReport {
    /// Whether any file in the batch was rejected.
    #[must_use]
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}
