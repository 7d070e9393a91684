//! Settings loading for the CLI.
//!
//! Settings come from an optional JSON file; omitted keys keep their
//! defaults. Flag and environment overrides are applied on top, then the
//! result is validated.

use std::fs;
use std::path::Path;

use meeshoguard_core::{UploaderSettings, validate_settings};

use crate::commands::SettingsOverrides;
use crate::error::CliError;

/// Read settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<UploaderSettings, CliError> {
    let Some(path) = path else {
        return Ok(UploaderSettings::default());
    };

    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Config(format!("invalid settings in {}: {e}", path.display())))
}

/// Load, override, and validate settings.
pub fn resolve_settings(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<UploaderSettings, CliError> {
    let settings = overrides.apply(load_settings(path)?);
    validate_settings(&settings)?;
    tracing::debug!(?settings, "Resolved uploader settings");
    Ok(settings)
}
