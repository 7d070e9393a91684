//! `meeshoguard settings`: print the effective settings.

use meeshoguard_core::UploaderSettings;

use crate::error::CliError;

/// Print `settings` as pretty JSON.
pub fn execute(settings: &UploaderSettings) -> Result<(), CliError> {
    println!("{}", render(settings)?);
    Ok(())
}

fn render(settings: &UploaderSettings) -> Result<String, CliError> {
    serde_json::to_string_pretty(settings).map_err(|e| CliError::Config(e.to_string()))
}
