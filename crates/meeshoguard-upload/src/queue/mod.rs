//! Upload queue management.
//!
//! This module provides a pure state machine for the upload queue.
//! No timers or I/O are involved; the orchestrator (`UploadManager`) drives
//! it and turns its results into events.
//!
//! # Design
//!
//! - Pure synchronous state machine (no async, no IO, no tracing)
//! - Insertion-ordered: admissions append, removals keep the relative order
//! - Operations on an id that is no longer queued are silent no-ops

mod validation;

use indexmap::IndexMap;

use meeshoguard_core::upload::{
    AdmissionReport, FileDescriptor, PROGRESS_COMPLETE, UploadEntry, UploadError, UploadId,
    UploadStatus,
};
use meeshoguard_core::UploaderSettings;

pub use validation::AdmissionPolicy;

/// Manages the ordered set of upload entries.
///
/// This is a sync type with no internal locking; the caller
/// (`UploadManager`) is responsible for synchronization.
pub struct UploadQueue {
    entries: IndexMap<UploadId, UploadEntry>,
    policy: AdmissionPolicy,
}

impl UploadQueue {
    /// Create an empty queue with the given admission policy.
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            entries: IndexMap::new(),
            policy,
        }
    }

    /// Create an empty queue configured from uploader settings.
    pub fn from_settings(settings: &UploaderSettings) -> Self {
        Self::new(AdmissionPolicy::from_settings(settings))
    }

    /// The admission policy in force.
    pub const fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether an id is currently queued.
    pub fn contains(&self, id: &UploadId) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up an entry.
    pub fn get(&self, id: &UploadId) -> Option<&UploadEntry> {
        self.entries.get(id)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadEntry> {
        self.entries.values()
    }

    /// Ordered copy of every entry.
    pub fn snapshot(&self) -> Vec<UploadEntry> {
        self.entries.values().cloned().collect()
    }

    /// Validate a single file and append it as a new `uploading` entry.
    pub fn admit(&mut self, file: &FileDescriptor) -> Result<UploadEntry, UploadError> {
        self.policy.check(file)?;

        let mut id = UploadId::generate();
        while self.entries.contains_key(&id) {
            id = UploadId::generate();
        }

        let entry = UploadEntry::admitted(id.clone(), file);
        self.entries.insert(id, entry.clone());
        Ok(entry)
    }

    /// Admit a batch, keeping the valid subset in the order given.
    pub fn admit_batch(&mut self, files: &[FileDescriptor]) -> AdmissionReport {
        let mut report = AdmissionReport::default();
        for file in files {
            match self.admit(file) {
                Ok(entry) => report.admitted.push(entry),
                Err(err) => report.rejected.push(err),
            }
        }
        report
    }

    /// Set the progress of an entry's current phase.
    ///
    /// The value is clamped to `[0, 100]`. Returns the applied value, or
    /// `None` when nothing changed: the entry is gone, terminal, the value
    /// is not a number, or it would move progress backwards.
    pub fn update_progress(&mut self, id: &UploadId, progress: f64) -> Option<f64> {
        if progress.is_nan() {
            return None;
        }

        let entry = self.entries.get_mut(id)?;
        if entry.is_terminal() {
            return None;
        }

        let progress = progress.clamp(0.0, PROGRESS_COMPLETE);
        if progress <= entry.progress {
            return None;
        }

        entry.progress = progress;
        Some(progress)
    }

    /// Move an entry to a new status.
    ///
    /// Returns `Ok(None)` if the entry no longer exists, `Ok(Some(previous))`
    /// when the transition was applied. Entering `processing` starts the new
    /// phase at progress 0; entering `completed` pins progress at 100 and
    /// stores `result_count`.
    pub fn transition(
        &mut self,
        id: &UploadId,
        to: UploadStatus,
        result_count: Option<u32>,
    ) -> Result<Option<UploadStatus>, UploadError> {
        let Some(entry) = self.entries.get_mut(id) else {
            return Ok(None);
        };

        let from = entry.status;
        if !from.can_transition_to(to) {
            return Err(UploadError::invalid_transition(id.to_string(), from, to));
        }

        entry.status = to;
        match to {
            UploadStatus::Processing => entry.progress = 0.0,
            UploadStatus::Completed => {
                entry.progress = PROGRESS_COMPLETE;
                entry.result_count = result_count;
            }
            UploadStatus::Uploading | UploadStatus::Error => {}
        }

        Ok(Some(from))
    }

    /// Remove an entry. Removing an absent id is not an error.
    pub fn remove(&mut self, id: &UploadId) -> Option<UploadEntry> {
        self.entries.shift_remove(id)
    }
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::from_settings(&UploaderSettings::default())
    }
}
