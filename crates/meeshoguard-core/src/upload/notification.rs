//! Human-readable notices surfaced to the user.

use serde::{Deserialize, Serialize};

use super::errors::UploadError;
use super::types::PDF_MEDIA_TYPE;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Informational (e.g. processing finished).
    Info,
    /// Something the user did was rejected.
    Error,
}

/// A toast-style message with a title and a body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notification {
    /// Create an informational notification.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create an error notification.
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Notice emitted when an entry finishes its processing phase.
    pub fn processing_complete(file_name: &str, result_count: u32) -> Self {
        Self::info(
            "Processing Complete",
            format!("Successfully processed {result_count} labels from {file_name}"),
        )
    }

    /// Single batched notice for every file rejected in one admission.
    ///
    /// Returns `None` when nothing was rejected.
    pub fn invalid_files(rejected: &[UploadError], accepted_media_type: &str) -> Option<Self> {
        if rejected.is_empty() {
            return None;
        }

        let names = rejected
            .iter()
            .filter_map(UploadError::file_name)
            .collect::<Vec<_>>()
            .join(", ");

        let only_type_errors = rejected
            .iter()
            .all(|err| matches!(err, UploadError::InvalidMediaType { .. }));

        let message = if only_type_errors {
            format!(
                "Please upload only {} files. Rejected: {names}",
                media_type_label(accepted_media_type)
            )
        } else {
            rejected
                .iter()
                .map(UploadError::user_message)
                .collect::<Vec<_>>()
                .join(" ")
        };

        Some(Self::error("Invalid Files", message))
    }
}

fn media_type_label(media_type: &str) -> &str {
    if media_type == PDF_MEDIA_TYPE {
        "PDF"
    } else {
        media_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_complete_text() {
        let n = Notification::processing_complete("shipment.pdf", 7);
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.title, "Processing Complete");
        assert_eq!(n.message, "Successfully processed 7 labels from shipment.pdf");
    }

    #[test]
    fn test_no_rejections_no_notice() {
        assert!(Notification::invalid_files(&[], PDF_MEDIA_TYPE).is_none());
    }

    #[test]
    fn test_batched_type_rejections() {
        let rejected = vec![
            UploadError::invalid_media_type("a.png", "image/png", PDF_MEDIA_TYPE),
            UploadError::invalid_media_type("b.txt", "text/plain", PDF_MEDIA_TYPE),
        ];
        let n = Notification::invalid_files(&rejected, PDF_MEDIA_TYPE).unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Invalid Files");
        assert_eq!(n.message, "Please upload only PDF files. Rejected: a.png, b.txt");
    }

    #[test]
    fn test_mixed_rejections_list_reasons() {
        let rejected = vec![
            UploadError::invalid_media_type("a.png", "image/png", PDF_MEDIA_TYPE),
            UploadError::file_too_large("big.pdf", 2048, 1024),
        ];
        let n = Notification::invalid_files(&rejected, PDF_MEDIA_TYPE).unwrap();
        assert!(n.message.contains("a.png"));
        assert!(n.message.contains("big.pdf"));
        assert!(n.message.contains("1 KB"));
    }
}
