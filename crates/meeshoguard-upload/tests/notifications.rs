//! Notification contract of `UploadManager`, checked with mock sinks.

mod common;

use std::sync::Arc;

use mockall::mock;
use mockall::predicate::function;

use common::{RecordingEmitter, manager_with};
use meeshoguard_core::NoopUploadEmitter;
use meeshoguard_upload::{
    ChannelNotificationSink, FileDescriptor, Notification, NotificationKind,
    NotificationSinkPort, SequenceProgressSource, UploadEntry, UploadManagerDeps,
    UploaderSettings, build_upload_manager,
};

mock! {
    pub Notifier {}

    impl NotificationSinkPort for Notifier {
        fn notify(&self, notification: Notification);
    }
}

#[tokio::test(start_paused = true)]
async fn one_notice_per_rejected_batch() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .with(function(|n: &Notification| {
            n.kind == NotificationKind::Error
                && n.title == "Invalid Files"
                && n.message.contains("b.png")
                && n.message.contains("c.txt")
        }))
        .times(1)
        .return_const(());

    let emitter = RecordingEmitter::new();
    let manager = manager_with(&emitter, notifier, SequenceProgressSource::constant(10.0, 5));

    let report = manager
        .admit(vec![
            FileDescriptor::pdf("a.pdf", 1),
            FileDescriptor::new("b.png", 1, "image/png"),
            FileDescriptor::new("c.txt", 1, "text/plain"),
        ])
        .await;
    assert_eq!(report.admitted.len(), 1);

    // Stop before a.pdf completes so no completion notice is sent
    manager.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn no_notice_for_fully_valid_batch() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|n| n.title == "Processing Complete")
        .times(2)
        .return_const(());

    let emitter = RecordingEmitter::new();
    let manager = manager_with(&emitter, notifier, SequenceProgressSource::constant(50.0, 8));

    manager
        .admit(vec![FileDescriptor::pdf("a.pdf", 1), FileDescriptor::pdf("b.pdf", 1)])
        .await;
    manager.wait_until_settled().await;
}

#[tokio::test(start_paused = true)]
async fn size_limit_rejection_uses_user_message() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|n| n.title == "Invalid Files" && n.message.contains("big.pdf"))
        .times(1)
        .return_const(());

    let manager = build_upload_manager(UploadManagerDeps {
        event_emitter: Arc::new(RecordingEmitter::new()),
        notifier: Arc::new(notifier),
        progress_source: Arc::new(SequenceProgressSource::constant(10.0, 5)),
        settings: UploaderSettings::default().with_max_file_size(Some(10 * 1024 * 1024)),
    })
    .unwrap();

    let report = manager
        .admit(vec![FileDescriptor::pdf("big.pdf", 11 * 1024 * 1024)])
        .await;
    assert!(report.admitted.is_empty());
    assert!(report.rejected[0].is_validation());
}

/// A reader that stops once the list is terminal must already hold every
/// completion notice, even when simulations run on other worker threads.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn completion_notices_precede_settled_list() {
    const FILES: usize = 4;

    for run in 0..50 {
        let (notifier, mut notices) = ChannelNotificationSink::new();
        let manager = build_upload_manager(UploadManagerDeps {
            event_emitter: Arc::new(NoopUploadEmitter::new()),
            notifier: Arc::new(notifier),
            progress_source: Arc::new(SequenceProgressSource::constant(50.0, 3)),
            settings: UploaderSettings::default()
                .with_ticks(1, 1)
                .with_phase_gap(1),
        })
        .unwrap();

        let mut entries = manager.subscribe();
        let files = (0..FILES)
            .map(|i| FileDescriptor::pdf(format!("label-{i}.pdf"), 1))
            .collect();
        let report = manager.admit(files).await;
        assert_eq!(report.admitted.len(), FILES);

        // Same loop shape as the CLI: stop on the first all-terminal list
        loop {
            entries.changed().await.unwrap();
            if entries.borrow_and_update().iter().all(UploadEntry::is_terminal) {
                break;
            }
        }

        let mut completed = 0;
        while let Ok(notice) = notices.try_recv() {
            assert_eq!(notice.title, "Processing Complete");
            completed += 1;
        }
        assert_eq!(completed, FILES, "run {run} lost a completion notice");
    }
}
