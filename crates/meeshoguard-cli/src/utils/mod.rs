//! Shared helpers for CLI handlers.

pub mod files;

pub use files::{describe_file, guess_media_type};
