//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use meeshoguard_core::UploaderSettings;

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload label PDFs and follow them until processing completes
    Simulate(SimulateArgs),

    /// Print the effective uploader settings as JSON
    Settings {
        #[command(flatten)]
        overrides: SettingsOverrides,
    },
}

/// Arguments of `meeshoguard simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Files to upload
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Seed for reproducible progress
    #[arg(long, env = "MEESHOGUARD_SEED")]
    pub seed: Option<u64>,

    /// Print events as JSON lines instead of progress bars
    #[arg(long, conflicts_with = "plain")]
    pub json: bool,

    /// Print one line per status change, even on a terminal
    #[arg(long)]
    pub plain: bool,

    #[command(flatten)]
    pub overrides: SettingsOverrides,
}

/// Flag and environment overrides applied on top of the config file.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Upload phase tick period in milliseconds
    #[arg(long, env = "MEESHOGUARD_UPLOAD_TICK_MS")]
    pub upload_tick_ms: Option<u64>,

    /// Processing phase tick period in milliseconds
    #[arg(long, env = "MEESHOGUARD_PROCESSING_TICK_MS")]
    pub processing_tick_ms: Option<u64>,

    /// Pause between the upload and processing phases in milliseconds
    #[arg(long, env = "MEESHOGUARD_PHASE_GAP_MS")]
    pub phase_gap_ms: Option<u64>,

    /// Reject files larger than this many bytes
    #[arg(long, env = "MEESHOGUARD_MAX_FILE_SIZE", value_name = "BYTES")]
    pub max_file_size: Option<u64>,
}

impl SettingsOverrides {
    /// Apply every override that was given.
    #[must_use]
    pub fn apply(&self, mut settings: UploaderSettings) -> UploaderSettings {
        if let Some(ms) = self.upload_tick_ms {
            settings.upload_tick_ms = ms;
        }
        if let Some(ms) = self.processing_tick_ms {
            settings.processing_tick_ms = ms;
        }
        if let Some(ms) = self.phase_gap_ms {
            settings.phase_gap_ms = ms;
        }
        if self.max_file_size.is_some() {
            settings.max_file_size_bytes = self.max_file_size;
        }
        settings
    }
}
