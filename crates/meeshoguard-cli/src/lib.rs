//! Terminal front-end for the MeeshoGuard label uploader.
//!
//! - `parser` / `commands` - clap definitions
//! - `config` - settings file loading and overrides
//! - `handlers` - one module per subcommand
//! - `presentation` - progress bars and notification lines
//! - `utils` - turning paths into admission descriptors

#![deny(unsafe_code)]

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use commands::{Commands, SettingsOverrides, SimulateArgs};
pub use config::{load_settings, resolve_settings};
pub use error::CliError;
pub use parser::Cli;
