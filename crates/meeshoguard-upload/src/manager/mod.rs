//! Upload manager implementation.
//!
//! Owns the queue, schedules one simulation task per admitted entry, and
//! publishes every change to presentation layers.
//!
//! # Architecture
//!
//! - **Manager**: Orchestrates admission, removal, and simulation lifecycle
//! - **Simulator**: Drives the phase timers and reports back through `SimulationSink`
//! - **Publishing**: A `watch` channel carries the ordered entry list; the
//!   emitter port carries fine-grained `UploadEvent`s
//!
//! # Concurrency Model
//!
//! - Every queue mutation and its event happen under the queue lock, so
//!   subscribers never see an event for an entry after its `EntryRemoved`
//! - A completion notice is sent before the terminal list is published, so a
//!   reader that sees every entry terminal can drain every notice
//! - Lease tokens prevent a cancelled run from writing into the queue
//! - Lock order: queue → active (consistent everywhere)

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;

use meeshoguard_core::upload::{
    AdmissionReport, FileDescriptor, Notification, PROGRESS_COMPLETE, Phase, UploadEntry,
    UploadEvent, UploadId, UploadStatus,
};
use meeshoguard_core::{
    NotificationSinkPort, ProgressSource, SettingsError, UploadEventEmitterPort,
    UploaderSettings, validate_settings,
};

use crate::queue::UploadQueue;
use crate::simulator::{LeaseId, ProgressSimulator, SimulationJob, SimulationSink};

/// State for a running simulation.
struct ActiveSimulation {
    /// Unique lease for this run.
    lease: LeaseId,
    /// Cancellation token.
    cancel: CancellationToken,
}

/// Dependencies for creating an upload manager.
///
/// This struct bundles the ports and settings needed to construct an
/// `UploadManager`.
pub struct UploadManagerDeps<E, N, P>
where
    E: UploadEventEmitterPort + 'static,
    N: NotificationSinkPort + 'static,
    P: ProgressSource + 'static,
{
    /// Port for emitting upload events.
    pub event_emitter: Arc<E>,
    /// Port for user-facing notices.
    pub notifier: Arc<N>,
    /// Source of progress increments and result counts.
    pub progress_source: Arc<P>,
    /// Simulation settings.
    pub settings: UploaderSettings,
}

/// Build an upload manager from its dependencies.
///
/// # Errors
///
/// Returns a `SettingsError` if the settings fail validation.
pub fn build_upload_manager<E, N, P>(
    deps: UploadManagerDeps<E, N, P>,
) -> Result<UploadManager, SettingsError>
where
    E: UploadEventEmitterPort + 'static,
    N: NotificationSinkPort + 'static,
    P: ProgressSource + 'static,
{
    validate_settings(&deps.settings)?;
    Ok(UploadManager::new(
        deps.event_emitter,
        deps.notifier,
        deps.progress_source,
        deps.settings,
    ))
}

/// Orchestrator of the upload lifecycle.
///
/// Cheap to clone; clones share the same queue. Must be used from within a
/// Tokio runtime because admission spawns simulation tasks.
#[derive(Clone)]
pub struct UploadManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    /// Queue state.
    queue: Mutex<UploadQueue>,
    /// Running simulations (keyed by entry ID).
    /// Lock order: always acquire queue lock before active lock.
    active: Mutex<HashMap<UploadId, ActiveSimulation>>,
    /// Counter for generating lease IDs.
    lease_counter: AtomicU64,
    /// Parent of every simulation token.
    shutdown: CancellationToken,
    simulator: ProgressSimulator,
    event_emitter: Arc<dyn UploadEventEmitterPort>,
    notifier: Arc<dyn NotificationSinkPort>,
    /// Ordered entry list for presentation layers.
    entries_tx: watch::Sender<Vec<UploadEntry>>,
}

impl UploadManager {
    fn new(
        event_emitter: Arc<dyn UploadEventEmitterPort>,
        notifier: Arc<dyn NotificationSinkPort>,
        progress_source: Arc<dyn ProgressSource>,
        settings: UploaderSettings,
    ) -> Self {
        let (entries_tx, _) = watch::channel(Vec::new());

        Self {
            inner: Arc::new(ManagerInner {
                queue: Mutex::new(UploadQueue::from_settings(&settings)),
                active: Mutex::new(HashMap::new()),
                lease_counter: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
                simulator: ProgressSimulator::new(settings, progress_source),
                event_emitter,
                notifier,
                entries_tx,
            }),
        }
    }

    /// The settings the manager runs with.
    pub fn settings(&self) -> &UploaderSettings {
        self.inner.simulator.settings()
    }

    /// Admit a batch of files.
    ///
    /// Valid files are appended in the order given and start uploading
    /// immediately. Rejected files produce one batched "Invalid Files"
    /// notification; they never enter the queue.
    pub async fn admit(&self, files: Vec<FileDescriptor>) -> AdmissionReport {
        let inner = &self.inner;
        let mut jobs = Vec::new();

        let report = {
            let mut queue = inner.queue.lock().await;
            let report = queue.admit_batch(&files);

            if !report.admitted.is_empty() {
                let mut active = inner.active.lock().await;
                for entry in &report.admitted {
                    let lease = LeaseId(inner.lease_counter.fetch_add(1, Ordering::Relaxed));
                    let cancel = inner.shutdown.child_token();
                    active.insert(
                        entry.id.clone(),
                        ActiveSimulation {
                            lease,
                            cancel: cancel.clone(),
                        },
                    );
                    jobs.push(SimulationJob {
                        id: entry.id.clone(),
                        lease,
                        cancel,
                    });
                    inner
                        .event_emitter
                        .emit(UploadEvent::admitted(entry.clone()));
                }
                drop(active);
                inner.publish(&queue, true);
            }

            report
        };

        for err in &report.rejected {
            tracing::info!(
                target: "meeshoguard.upload",
                file = err.file_name().unwrap_or_default(),
                error = %err,
                "Rejected file"
            );
        }

        let accepted = inner.simulator.settings().accepted_media_type.clone();
        if let Some(notice) = Notification::invalid_files(&report.rejected, &accepted) {
            inner.notifier.notify(notice);
        }

        for job in jobs {
            tracing::debug!(target: "meeshoguard.upload", id = %job.id, "Starting simulation");
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { inner.run_simulation(job).await });
        }

        tracing::info!(
            target: "meeshoguard.upload",
            admitted = report.admitted.len(),
            rejected = report.rejected.len(),
            "Admitted files"
        );
        report
    }

    /// Remove an entry in any status.
    ///
    /// Its pending timers are cancelled before it leaves the queue, so no
    /// further event is published for it. Returns `false` if the id was
    /// not queued.
    pub async fn remove(&self, id: &UploadId) -> bool {
        let inner = &self.inner;
        let mut queue = inner.queue.lock().await;

        if let Some(job) = inner.active.lock().await.remove(id) {
            job.cancel.cancel();
            tracing::debug!(target: "meeshoguard.upload", id = %id, "Cancelled simulation");
        }

        let Some(entry) = queue.remove(id) else {
            return false;
        };

        inner.event_emitter.emit(UploadEvent::removed(entry.id));
        inner.publish(&queue, true);
        drop(queue);

        tracing::info!(target: "meeshoguard.upload", id = %id, name = %entry.name, "Removed entry");
        true
    }

    /// Ordered copy of every entry.
    pub fn snapshot(&self) -> Vec<UploadEntry> {
        self.inner.entries_tx.borrow().clone()
    }

    /// Look up a single entry.
    pub fn get(&self, id: &UploadId) -> Option<UploadEntry> {
        self.inner
            .entries_tx
            .borrow()
            .iter()
            .find(|entry| &entry.id == id)
            .cloned()
    }

    /// Subscribe to the ordered entry list.
    ///
    /// The receiver always holds the latest list; intermediate states may
    /// be skipped by slow readers. Use the event emitter for every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadEntry>> {
        self.inner.entries_tx.subscribe()
    }

    /// Number of simulations still running.
    pub async fn active_count(&self) -> usize {
        self.inner.active.lock().await.len()
    }

    /// Wait until every queued entry is terminal (or the queue is empty).
    ///
    /// Also returns once `shutdown` has run, since frozen entries never
    /// reach a terminal status.
    pub async fn wait_until_settled(&self) {
        let mut rx = self.subscribe();
        tokio::select! {
            biased;
            () = self.inner.shutdown.cancelled() => {}
            // The sender lives as long as `self`, so this cannot fail
            _ = rx.wait_for(|entries| entries.iter().all(UploadEntry::is_terminal)) => {}
        }
    }

    /// Cancel every running simulation. Entries stay in the queue.
    pub async fn shutdown(&self) -> usize {
        self.inner.shutdown.cancel();
        let mut active = self.inner.active.lock().await;
        let count = active.len();
        active.clear();
        tracing::info!(target: "meeshoguard.upload", count, "Cancelled simulations on shutdown");
        count
    }
}

impl ManagerInner {
    /// Publish the queue to the watch channel, and optionally as an event.
    fn publish(&self, queue: &UploadQueue, emit_snapshot: bool) {
        let entries = queue.snapshot();
        if emit_snapshot {
            self.event_emitter
                .emit(UploadEvent::queue_snapshot(entries.clone()));
        }
        self.entries_tx.send_replace(entries);
    }

    /// Whether `job` still holds the lease of its entry.
    async fn holds_lease(&self, job: &SimulationJob) -> bool {
        self.active
            .lock()
            .await
            .get(&job.id)
            .is_some_and(|active| active.lease == job.lease)
    }

    /// Drop the active record of `job` if it is still the current run.
    async fn release(&self, job: &SimulationJob) {
        let mut active = self.active.lock().await;
        if active.get(&job.id).is_some_and(|a| a.lease == job.lease) {
            active.remove(&job.id);
        }
    }

    async fn run_simulation(self: Arc<Self>, job: SimulationJob) {
        match self.simulator.run(&job, &*self).await {
            Ok(result_count) => {
                tracing::debug!(
                    target: "meeshoguard.upload",
                    id = %job.id,
                    result_count,
                    "Simulation finished"
                );
            }
            Err(e) if e.is_cancelled() => {
                tracing::debug!(target: "meeshoguard.upload", id = %job.id, "Simulation cancelled");
            }
            Err(e) => {
                tracing::warn!(target: "meeshoguard.upload", id = %job.id, error = %e, "Simulation failed");
                self.fail(&job).await;
            }
        }
        self.release(&job).await;
    }

    /// Move an entry whose simulation failed to `error`.
    async fn fail(&self, job: &SimulationJob) {
        let mut queue = self.queue.lock().await;
        if !self.holds_lease(job).await {
            return;
        }
        if let Ok(Some(from)) = queue.transition(&job.id, UploadStatus::Error, None) {
            self.event_emitter.emit(UploadEvent::status_changed(
                job.id.clone(),
                from,
                UploadStatus::Error,
                None,
            ));
            self.publish(&queue, false);
        }
    }
}

#[async_trait]
impl SimulationSink for ManagerInner {
    async fn report_progress(&self, job: &SimulationJob, phase: Phase, progress: f64) -> bool {
        let mut queue = self.queue.lock().await;
        if !self.holds_lease(job).await {
            tracing::debug!(target: "meeshoguard.upload", id = %job.id, "Ignoring stale progress (lease mismatch)");
            return false;
        }

        if let Some(applied) = queue.update_progress(&job.id, progress) {
            self.event_emitter
                .emit(UploadEvent::progress(job.id.clone(), phase.status(), applied));
            self.publish(&queue, false);
        }
        queue.contains(&job.id)
    }

    async fn finish_phase(
        &self,
        job: &SimulationJob,
        phase: Phase,
        result_count: Option<u32>,
    ) -> bool {
        let mut queue = self.queue.lock().await;
        if !self.holds_lease(job).await {
            tracing::debug!(target: "meeshoguard.upload", id = %job.id, "Ignoring stale phase end (lease mismatch)");
            return false;
        }

        if let Some(applied) = queue.update_progress(&job.id, PROGRESS_COMPLETE) {
            self.event_emitter
                .emit(UploadEvent::progress(job.id.clone(), phase.status(), applied));
        }

        let to = phase.completion_status();
        let from = match queue.transition(&job.id, to, result_count) {
            Ok(Some(from)) => from,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(target: "meeshoguard.upload", id = %job.id, error = %e, "Rejected phase transition");
                return false;
            }
        };

        self.event_emitter.emit(UploadEvent::status_changed(
            job.id.clone(),
            from,
            to,
            result_count,
        ));

        let name = queue
            .get(&job.id)
            .map(|entry| entry.name.clone())
            .unwrap_or_default();

        // The notice must be queued before the terminal list is visible
        if let (UploadStatus::Completed, Some(count)) = (to, result_count) {
            self.notifier
                .notify(Notification::processing_complete(&name, count));
        }
        self.publish(&queue, false);
        drop(queue);

        tracing::info!(target: "meeshoguard.upload", id = %job.id, name = %name, status = %to, "Phase finished");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use meeshoguard_core::{NoopNotificationSink, NoopUploadEmitter};

    use crate::progress::SequenceProgressSource;

    fn manager(step: f64) -> UploadManager {
        build_upload_manager(UploadManagerDeps {
            event_emitter: Arc::new(NoopUploadEmitter::new()),
            notifier: Arc::new(NoopNotificationSink::new()),
            progress_source: Arc::new(SequenceProgressSource::constant(step, 12)),
            settings: UploaderSettings::default(),
        })
        .unwrap()
    }

    #[test]
    fn lease_id_equality() {
        assert_eq!(LeaseId(1), LeaseId(1));
        assert_ne!(LeaseId(1), LeaseId(2));
    }

    #[test]
    fn test_build_rejects_invalid_settings() {
        let result = build_upload_manager(UploadManagerDeps {
            event_emitter: Arc::new(NoopUploadEmitter::new()),
            notifier: Arc::new(NoopNotificationSink::new()),
            progress_source: Arc::new(SequenceProgressSource::constant(1.0, 5)),
            settings: UploaderSettings::default().with_ticks(0, 300),
        });
        assert!(matches!(result, Err(SettingsError::ZeroTick(Phase::Upload))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_admit_registers_active_simulation() {
        let manager = manager(10.0);
        let report = manager
            .admit(vec![FileDescriptor::pdf("a.pdf", 10)])
            .await;

        assert_eq!(report.admitted.len(), 1);
        assert_eq!(manager.active_count().await, 1);
        assert_eq!(manager.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_releases_active_simulation() {
        let manager = manager(10.0);
        let report = manager
            .admit(vec![FileDescriptor::pdf("a.pdf", 10)])
            .await;
        let id = report.admitted[0].id.clone();

        assert!(manager.remove(&id).await);
        assert_eq!(manager.active_count().await, 0);
        assert!(manager.get(&id).is_none());
        assert!(!manager.remove(&id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_releases_lease() {
        let manager = manager(50.0);
        let report = manager
            .admit(vec![FileDescriptor::pdf("a.pdf", 10)])
            .await;

        manager.wait_until_settled().await;

        let entry = manager.get(&report.admitted[0].id).unwrap();
        assert_eq!(entry.status, UploadStatus::Completed);
        assert_eq!(entry.result_count, Some(12));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(manager.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_freezes_entries() {
        let manager = manager(10.0);
        manager
            .admit(vec![FileDescriptor::pdf("a.pdf", 10)])
            .await;

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(manager.shutdown().await, 1);
        let frozen = manager.snapshot();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(manager.snapshot(), frozen);
        assert_eq!(frozen[0].status, UploadStatus::Uploading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_settled_returns_after_shutdown() {
        let manager = manager(10.0);
        manager
            .admit(vec![FileDescriptor::pdf("a.pdf", 10)])
            .await;

        let mut waiter = tokio_test::task::spawn(manager.wait_until_settled());
        tokio_test::assert_pending!(waiter.poll());

        manager.shutdown().await;

        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
        assert!(!manager.snapshot()[0].is_terminal());
    }
}
