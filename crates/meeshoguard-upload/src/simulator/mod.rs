//! Progress simulator.
//!
//! Drives one entry through the upload and processing phases on timers.
//! The simulator never touches the queue: it reports through a
//! `SimulationSink`, which the manager implements on top of the queue's own
//! operations.
//!
//! # Design Principles
//!
//! - The simulator receives a `SimulationJob` (value type) and reports through a sink
//! - Cancellation is handled via `tokio::select!` around every wait
//! - A sink answering `false` means the entry is gone; the simulator stops

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tokio_util::sync::CancellationToken;

use meeshoguard_core::upload::{Phase, UploadError, UploadId};
use meeshoguard_core::{ProgressSource, UploaderSettings};

use crate::progress::{PhaseStep, PhaseTracker};

/// Lease ID for tracking one simulation run of an entry.
///
/// Used to drop reports from a run that is no longer the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseId(pub u64);

/// A simulation to be executed.
#[derive(Debug, Clone)]
pub struct SimulationJob {
    /// Entry being simulated.
    pub id: UploadId,
    /// Lease minted when the simulation was scheduled.
    pub lease: LeaseId,
    /// Cancelled when the entry is removed.
    pub cancel: CancellationToken,
}

/// Receiver of simulation reports.
///
/// Every method returns `false` when the entry no longer accepts updates
/// (removed, lease superseded); the simulator stops on the first `false`.
#[async_trait]
pub trait SimulationSink: Send + Sync {
    /// Progress of `phase` advanced to `progress` (below 100).
    async fn report_progress(&self, job: &SimulationJob, phase: Phase, progress: f64) -> bool;

    /// `phase` reached 100. `result_count` is set when the processing phase ends.
    async fn finish_phase(
        &self,
        job: &SimulationJob,
        phase: Phase,
        result_count: Option<u32>,
    ) -> bool;
}

/// Timer-driven two-phase simulator.
#[derive(Clone)]
pub struct ProgressSimulator {
    settings: UploaderSettings,
    source: Arc<dyn ProgressSource>,
}

impl ProgressSimulator {
    /// Create a simulator with the given timing settings and increment source.
    pub fn new(settings: UploaderSettings, source: Arc<dyn ProgressSource>) -> Self {
        Self { settings, source }
    }

    /// The settings this simulator runs with.
    pub const fn settings(&self) -> &UploaderSettings {
        &self.settings
    }

    /// Run both phases for `job`.
    ///
    /// Returns the simulated result count on completion, or
    /// `Err(UploadError::Cancelled)` if the job was cancelled or the sink
    /// stopped accepting updates.
    pub async fn run(
        &self,
        job: &SimulationJob,
        sink: &dyn SimulationSink,
    ) -> Result<u32, UploadError> {
        self.run_phase(job, Phase::Upload, sink).await?;

        tokio::select! {
            biased;
            () = job.cancel.cancelled() => return Err(UploadError::Cancelled),
            () = sleep(self.settings.phase_gap()) => {}
        }

        self.run_phase(job, Phase::Processing, sink)
            .await?
            .ok_or_else(|| UploadError::other("processing phase ended without a result count"))
    }

    /// Tick one phase until its accumulator reaches 100.
    async fn run_phase(
        &self,
        job: &SimulationJob,
        phase: Phase,
        sink: &dyn SimulationSink,
    ) -> Result<Option<u32>, UploadError> {
        let period = self.settings.tick_for(phase);
        let ceiling = self.settings.increment_ceiling(phase);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tracker = PhaseTracker::new(phase);

        loop {
            tokio::select! {
                biased;
                () = job.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = ticker.tick() => {}
            }

            match tracker.advance(self.source.next_increment(phase, ceiling)) {
                PhaseStep::Advanced(progress) => {
                    if !sink.report_progress(job, phase, progress).await {
                        return Err(UploadError::Cancelled);
                    }
                }
                PhaseStep::Finished => {
                    let result_count = (phase == Phase::Processing).then(|| {
                        self.source.result_count(
                            self.settings.result_count_min,
                            self.settings.result_count_max,
                        )
                    });

                    if !sink.finish_phase(job, phase, result_count).await {
                        return Err(UploadError::Cancelled);
                    }
                    return Ok(result_count);
                }
            }
        }
    }
}
