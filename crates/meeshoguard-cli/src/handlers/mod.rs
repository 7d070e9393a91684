//! Command handlers.
//!
//! Each handler receives resolved settings plus its parsed arguments and
//! owns the presentation for its command.

pub mod settings;
pub mod simulate;
