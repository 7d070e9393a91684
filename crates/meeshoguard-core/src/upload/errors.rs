//! Upload error types.
//!
//! Serializable so adapters can forward them without depending on
//! runtime error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::UploadStatus;

/// Error type for upload operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadError {
    /// The declared media type is not the accepted kind.
    #[error("Invalid media type for {name}: expected {expected}, got {media_type}")]
    InvalidMediaType {
        /// Name of the rejected file.
        name: String,
        /// Media type the file declared.
        media_type: String,
        /// Media type the uploader accepts.
        expected: String,
    },

    /// The file exceeds the configured size limit.
    #[error("File too large: {name} is {size_bytes} bytes (limit {max_bytes})")]
    FileTooLarge {
        /// Name of the rejected file.
        name: String,
        /// Declared size.
        size_bytes: u64,
        /// Configured limit.
        max_bytes: u64,
    },

    /// The state machine does not allow this status change.
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// Entry identifier.
        id: String,
        /// Current status.
        from: UploadStatus,
        /// Requested status.
        to: UploadStatus,
    },

    /// The entry was removed while its simulation was running.
    #[error("Upload cancelled")]
    Cancelled,

    /// General/uncategorized error.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl UploadError {
    /// Create an invalid media type error.
    pub fn invalid_media_type(
        name: impl Into<String>,
        media_type: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidMediaType {
            name: name.into(),
            media_type: media_type.into(),
            expected: expected.into(),
        }
    }

    /// Create a file too large error.
    pub fn file_too_large(name: impl Into<String>, size_bytes: u64, max_bytes: u64) -> Self {
        Self::FileTooLarge {
            name: name.into(),
            size_bytes,
            max_bytes,
        }
    }

    /// Create an invalid transition error.
    pub fn invalid_transition(id: impl Into<String>, from: UploadStatus, to: UploadStatus) -> Self {
        Self::InvalidTransition {
            id: id.into(),
            from,
            to,
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Admission-time validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidMediaType { .. } | Self::FileTooLarge { .. })
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Name of the offending file, for validation failures.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::InvalidMediaType { name, .. } | Self::FileTooLarge { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidMediaType {
                name,
                media_type,
                expected,
            } => format!("'{name}' has type {media_type}; only {expected} is accepted."),
            Self::FileTooLarge {
                name, max_bytes, ..
            } => format!(
                "'{name}' is larger than the {} limit.",
                crate::utils::format_file_size(*max_bytes)
            ),
            Self::InvalidTransition { from, to, .. } => {
                format!("Cannot move an upload from {from} to {to}.")
            }
            Self::Cancelled => "Upload was cancelled.".to_string(),
            Self::Other { message } => message.clone(),
        }
    }
}
