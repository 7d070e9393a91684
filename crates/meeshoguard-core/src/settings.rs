//! Uploader settings and validation.
//!
//! Timing and range parameters of the upload simulation. Pure domain types
//! with no infrastructure dependencies; adapters decide where the values
//! come from (flags, environment, a JSON file).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::upload::{PDF_MEDIA_TYPE, Phase};

/// Default tick period of the upload phase.
pub const DEFAULT_UPLOAD_TICK_MS: u64 = 200;

/// Default tick period of the processing phase.
pub const DEFAULT_PROCESSING_TICK_MS: u64 = 300;

/// Default pause between the end of the upload phase and the first processing tick.
pub const DEFAULT_PHASE_GAP_MS: u64 = 500;

/// Settings for the upload simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderSettings {
    /// The single media type admission accepts.
    pub accepted_media_type: String,

    /// Optional per-file size limit in bytes. `None` disables the check.
    pub max_file_size_bytes: Option<u64>,

    /// Tick period of the upload phase, in milliseconds.
    pub upload_tick_ms: u64,

    /// Exclusive upper bound of a single upload-phase increment.
    pub upload_increment_max: f64,

    /// Pause before the processing phase starts, in milliseconds.
    pub phase_gap_ms: u64,

    /// Tick period of the processing phase, in milliseconds.
    pub processing_tick_ms: u64,

    /// Exclusive upper bound of a single processing-phase increment.
    pub processing_increment_max: f64,

    /// Smallest simulated label count.
    pub result_count_min: u32,

    /// Largest simulated label count (inclusive).
    pub result_count_max: u32,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            accepted_media_type: PDF_MEDIA_TYPE.to_string(),
            max_file_size_bytes: None,
            upload_tick_ms: DEFAULT_UPLOAD_TICK_MS,
            upload_increment_max: 20.0,
            phase_gap_ms: DEFAULT_PHASE_GAP_MS,
            processing_tick_ms: DEFAULT_PROCESSING_TICK_MS,
            processing_increment_max: 15.0,
            result_count_min: 5,
            result_count_max: 24,
        }
    }
}

impl UploaderSettings {
    /// Set the accepted media type.
    #[must_use]
    pub fn with_accepted_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.accepted_media_type = media_type.into();
        self
    }

    /// Set the per-file size limit.
    #[must_use]
    pub const fn with_max_file_size(mut self, max: Option<u64>) -> Self {
        self.max_file_size_bytes = max;
        self
    }

    /// Set both tick periods at once.
    #[must_use]
    pub const fn with_ticks(mut self, upload_ms: u64, processing_ms: u64) -> Self {
        self.upload_tick_ms = upload_ms;
        self.processing_tick_ms = processing_ms;
        self
    }

    /// Set the gap between phases.
    #[must_use]
    pub const fn with_phase_gap(mut self, gap_ms: u64) -> Self {
        self.phase_gap_ms = gap_ms;
        self
    }

    /// Tick period for `phase`.
    #[must_use]
    pub const fn tick_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Upload => Duration::from_millis(self.upload_tick_ms),
            Phase::Processing => Duration::from_millis(self.processing_tick_ms),
        }
    }

    /// Increment ceiling for `phase`.
    #[must_use]
    pub const fn increment_ceiling(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Upload => self.upload_increment_max,
            Phase::Processing => self.processing_increment_max,
        }
    }

    /// Pause between the two phases.
    #[must_use]
    pub const fn phase_gap(&self) -> Duration {
        Duration::from_millis(self.phase_gap_ms)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Tick period for the {0} phase must be at least 1 ms")]
    ZeroTick(Phase),

    #[error("Increment ceiling for the {0} phase must be a positive number")]
    InvalidIncrement(Phase),

    #[error("Result count range is empty: {min}..={max}")]
    EmptyResultRange { min: u32, max: u32 },

    #[error("Accepted media type cannot be empty")]
    EmptyMediaType,

    #[error("Maximum file size must be greater than zero")]
    ZeroMaxFileSize,
}

/// Validate settings values.
pub fn validate_settings(settings: &UploaderSettings) -> Result<(), SettingsError> {
    for phase in [Phase::Upload, Phase::Processing] {
        if settings.tick_for(phase).is_zero() {
            return Err(SettingsError::ZeroTick(phase));
        }

        let ceiling = settings.increment_ceiling(phase);
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(SettingsError::InvalidIncrement(phase));
        }
    }

    if settings.result_count_min > settings.result_count_max {
        return Err(SettingsError::EmptyResultRange {
            min: settings.result_count_min,
            max: settings.result_count_max,
        });
    }

    if settings.accepted_media_type.trim().is_empty() {
        return Err(SettingsError::EmptyMediaType);
    }

    if settings.max_file_size_bytes == Some(0) {
        return Err(SettingsError::ZeroMaxFileSize);
    }

    Ok(())
}
