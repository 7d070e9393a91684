//! Shared fixtures for upload manager integration tests.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use meeshoguard_core::{NotificationSinkPort, ProgressSource};
use meeshoguard_upload::{
    UploadEvent, UploadEventEmitterPort, UploadId, UploadManager, UploadManagerDeps,
    UploaderSettings, build_upload_manager,
};

/// Emitter that records every event with its offset from creation.
#[derive(Clone)]
pub struct RecordingEmitter {
    start: Instant,
    events: Arc<Mutex<Vec<(Duration, UploadEvent)>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<(Duration, UploadEvent)> {
        self.events.lock().unwrap().clone()
    }

    /// Events concerning one entry, in emission order.
    pub fn events_for(&self, id: &UploadId) -> Vec<(Duration, UploadEvent)> {
        self.events()
            .into_iter()
            .filter(|(_, event)| event.entry_id() == Some(id))
            .collect()
    }
}

impl UploadEventEmitterPort for RecordingEmitter {
    fn emit(&self, event: UploadEvent) {
        let at = self.start.elapsed();
        self.events.lock().unwrap().push((at, event));
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}

/// Build a manager with default settings around the given ports.
pub fn manager_with<N, P>(emitter: &RecordingEmitter, notifier: N, source: P) -> UploadManager
where
    N: NotificationSinkPort + 'static,
    P: ProgressSource + 'static,
{
    build_upload_manager(UploadManagerDeps {
        event_emitter: Arc::new(emitter.clone()),
        notifier: Arc::new(notifier),
        progress_source: Arc::new(source),
        settings: UploaderSettings::default(),
    })
    .unwrap()
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
