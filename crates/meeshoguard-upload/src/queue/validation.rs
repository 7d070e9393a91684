//! Admission checks applied before a file enters the queue.

use meeshoguard_core::upload::{FileDescriptor, UploadError};
use meeshoguard_core::UploaderSettings;

/// Rules a file must satisfy to be admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionPolicy {
    accepted_media_type: String,
    max_file_size: Option<u64>,
}

impl AdmissionPolicy {
    /// Accept exactly one media type, with no size limit.
    pub fn new(accepted_media_type: impl Into<String>) -> Self {
        Self {
            accepted_media_type: accepted_media_type.into(),
            max_file_size: None,
        }
    }

    /// Build the policy described by uploader settings.
    pub fn from_settings(settings: &UploaderSettings) -> Self {
        Self::new(settings.accepted_media_type.clone())
            .with_max_file_size(settings.max_file_size_bytes)
    }

    /// Set the per-file size limit.
    #[must_use]
    pub const fn with_max_file_size(mut self, max: Option<u64>) -> Self {
        self.max_file_size = max;
        self
    }

    /// The accepted media type.
    pub fn accepted_media_type(&self) -> &str {
        &self.accepted_media_type
    }

    /// Check a file against the policy.
    ///
    /// Media types compare case-insensitively and ignore parameters
    /// (`application/PDF; version=1.7` matches `application/pdf`).
    pub fn check(&self, file: &FileDescriptor) -> Result<(), UploadError> {
        if !essence(&file.media_type).eq_ignore_ascii_case(essence(&self.accepted_media_type)) {
            return Err(UploadError::invalid_media_type(
                &file.name,
                &file.media_type,
                &self.accepted_media_type,
            ));
        }

        if let Some(max) = self.max_file_size {
            if file.size_bytes > max {
                return Err(UploadError::file_too_large(&file.name, file.size_bytes, max));
            }
        }

        Ok(())
    }
}

fn essence(media_type: &str) -> &str {
    media_type.split(';').next().unwrap_or_default().trim()
}
