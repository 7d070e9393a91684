//! Small shared helpers.

pub mod file_size;

pub use file_size::format_file_size;
