//! Progress stepping and increment sources.
//!
//! This module turns raw increments into displayed progress for one phase
//! and provides the `ProgressSource` implementations used by the simulator.

mod phase;
mod source;

pub use phase::{PhaseStep, PhaseTracker};
pub use source::{RandomProgressSource, SequenceProgressSource};
