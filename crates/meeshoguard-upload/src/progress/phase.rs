//! Per-phase progress accounting.

use meeshoguard_core::upload::{PROGRESS_COMPLETE, Phase};

/// Highest value displayed before the terminal tick of a phase.
const DISPLAY_CEILING: f64 = 99.0;

/// Result of feeding one tick's increment into a tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseStep {
    /// The phase continues; carries the progress to display.
    Advanced(f64),
    /// The accumulator reached 100; this tick ends the phase.
    Finished,
}

/// Accumulates increments for a single phase.
///
/// Displayed progress is capped at 99 until the accumulator reaches 100,
/// so 100 is only ever shown on the tick that ends the phase.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    phase: Phase,
    accumulated: f64,
}

impl PhaseTracker {
    /// Start a phase at zero.
    pub const fn new(phase: Phase) -> Self {
        Self {
            phase,
            accumulated: 0.0,
        }
    }

    /// The phase being tracked.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Raw accumulated progress.
    pub const fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Add one tick's increment. Negative or NaN increments count as zero.
    pub fn advance(&mut self, increment: f64) -> PhaseStep {
        if increment > 0.0 {
            self.accumulated += increment;
        }

        if self.accumulated >= PROGRESS_COMPLETE {
            PhaseStep::Finished
        } else {
            PhaseStep::Advanced(self.accumulated.min(DISPLAY_CEILING))
        }
    }
}
