//! Core domain types for label uploads.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::file_size::format_file_size;

/// Media type accepted by the label uploader unless configured otherwise.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Upper bound of the progress scale.
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Opaque identifier for an upload entry.
///
/// Assigned once at admission and never reused within a process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(String);

impl UploadId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UploadId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Lifecycle status of an upload entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// The file is being "uploaded" (phase 1).
    Uploading,
    /// Labels are being "extracted" (phase 2).
    Processing,
    /// Both phases finished; a result count is attached.
    Completed,
    /// Reserved terminal state. Nothing in the simulator produces it.
    Error,
}

impl UploadStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Parse from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "uploading" => Some(Self::Uploading),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Terminal statuses have no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Legal edges: `uploading -> processing`, `processing -> completed`,
    /// and any non-terminal status to `error`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Uploading, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Uploading | Self::Processing, Self::Error)
        )
    }

    /// The simulated phase running while an entry holds this status.
    #[must_use]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::Uploading => Some(Phase::Upload),
            Self::Processing => Some(Phase::Processing),
            Self::Completed | Self::Error => None,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two timed stages an entry passes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Simulated transfer of the file.
    Upload,
    /// Simulated label extraction.
    Processing,
}

impl Phase {
    /// Status held by an entry while this phase runs.
    #[must_use]
    pub const fn status(&self) -> UploadStatus {
        match self {
            Self::Upload => UploadStatus::Uploading,
            Self::Processing => UploadStatus::Processing,
        }
    }

    /// Status the entry moves to when this phase reaches 100.
    #[must_use]
    pub const fn completion_status(&self) -> UploadStatus {
        match self {
            Self::Upload => UploadStatus::Processing,
            Self::Processing => UploadStatus::Completed,
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Processing => "processing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a candidate file, as handed over by a picker or drop target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name including extension (e.g. `shipment.pdf`).
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Declared media type (e.g. `application/pdf`).
    pub media_type: String,
}

impl FileDescriptor {
    /// Create a new descriptor.
    pub fn new(name: impl Into<String>, size_bytes: u64, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            media_type: media_type.into(),
        }
    }

    /// Create a descriptor declaring the PDF media type.
    pub fn pdf(name: impl Into<String>, size_bytes: u64) -> Self {
        Self::new(name, size_bytes, PDF_MEDIA_TYPE)
    }
}

/// One admitted file and its lifecycle state within the upload queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadEntry {
    /// Stable identifier assigned at admission.
    pub id: UploadId,
    /// File name captured at admission.
    pub name: String,
    /// File size captured at admission.
    pub size_bytes: u64,
    /// Current lifecycle status.
    pub status: UploadStatus,
    /// Progress of the current phase, in `[0, 100]`.
    pub progress: f64,
    /// Number of extracted labels; only set once completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<u32>,
}

impl UploadEntry {
    /// Create a freshly admitted entry (`uploading`, progress 0).
    pub fn admitted(id: UploadId, file: &FileDescriptor) -> Self {
        Self {
            id,
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            status: UploadStatus::Uploading,
            progress: 0.0,
            result_count: None,
        }
    }

    /// Whether the entry has reached a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress rounded to a whole percentage for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_progress(&self) -> u8 {
        self.progress.clamp(0.0, PROGRESS_COMPLETE).round() as u8
    }

    /// Human-readable size, e.g. `1.5 MB`.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        format_file_size(self.size_bytes)
    }

    /// Short caption describing the current status.
    #[must_use]
    pub fn status_caption(&self) -> String {
        match (self.status, self.result_count) {
            (UploadStatus::Uploading, _) => "Uploading...".to_string(),
            (UploadStatus::Processing, _) => "Processing...".to_string(),
            (UploadStatus::Completed, Some(count)) => format!("{count} labels extracted"),
            (UploadStatus::Completed, None) => "Completed".to_string(),
            (UploadStatus::Error, _) => "Error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = UploadId::generate();
        let b = UploadId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            UploadStatus::Uploading,
            UploadStatus::Processing,
            UploadStatus::Completed,
            UploadStatus::Error,
        ] {
            assert_eq!(UploadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UploadStatus::parse("queued"), None);
    }

    #[test]
    fn test_legal_transitions() {
        use UploadStatus::{Completed, Error, Processing, Uploading};

        assert!(Uploading.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Uploading.can_transition_to(Error));
        assert!(Processing.can_transition_to(Error));

        assert!(!Uploading.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Uploading));
        assert!(!Completed.can_transition_to(Error));
        assert!(!Error.can_transition_to(Uploading));
        assert!(!Error.can_transition_to(Processing));
        assert!(!Error.can_transition_to(Completed));
    }

    #[test]
    fn test_phase_mapping() {
        assert_eq!(UploadStatus::Uploading.phase(), Some(Phase::Upload));
        assert_eq!(UploadStatus::Processing.phase(), Some(Phase::Processing));
        assert_eq!(UploadStatus::Completed.phase(), None);
        assert_eq!(Phase::Upload.completion_status(), UploadStatus::Processing);
        assert_eq!(Phase::Processing.completion_status(), UploadStatus::Completed);
    }

    #[test]
    fn test_admitted_entry() {
        let file = FileDescriptor::pdf("shipment.pdf", 2048);
        let entry = UploadEntry::admitted(UploadId::new("abc"), &file);

        assert_eq!(entry.status, UploadStatus::Uploading);
        assert!(entry.progress.abs() < f64::EPSILON);
        assert_eq!(entry.result_count, None);
        assert_eq!(entry.formatted_size(), "2 KB");
        assert_eq!(entry.status_caption(), "Uploading...");
    }

    #[test]
    fn test_completed_caption() {
        let file = FileDescriptor::pdf("shipment.pdf", 10);
        let mut entry = UploadEntry::admitted(UploadId::new("abc"), &file);
        entry.status = UploadStatus::Completed;
        entry.progress = 100.0;
        entry.result_count = Some(12);

        assert_eq!(entry.status_caption(), "12 labels extracted");
        assert_eq!(entry.display_progress(), 100);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = UploadEntry::admitted(UploadId::new("xyz"), &FileDescriptor::pdf("a.pdf", 1));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"id\":\"xyz\""));
        assert!(json.contains("\"status\":\"uploading\""));
        assert!(!json.contains("result_count"));
    }
}
