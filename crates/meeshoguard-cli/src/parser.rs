//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the MeeshoGuard label uploader.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser, Debug)]
#[command(name = "meeshoguard")]
#[command(about = "Upload shipping-label PDFs and watch them get processed")]
#[command(version)]
pub struct Cli {
    /// JSON file with uploader settings
    #[arg(long, global = true, env = "MEESHOGUARD_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
