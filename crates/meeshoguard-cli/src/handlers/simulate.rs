//! `meeshoguard simulate`: admit files and follow them to completion.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use meeshoguard_core::{Notification, UploadEntry, UploadStatus, UploaderSettings};
use meeshoguard_upload::{
    BroadcastUploadEmitter, ChannelNotificationSink, RandomProgressSource, UploadManager,
    UploadManagerDeps, build_upload_manager,
};

use crate::commands::SimulateArgs;
use crate::error::CliError;
use crate::presentation::{QueueProgressPrinter, format_notice};
use crate::utils::describe_file;

/// How the run is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Bars,
    Plain,
    Json,
}

impl Output {
    const fn from_args(args: &SimulateArgs) -> Self {
        if args.json {
            Self::Json
        } else if args.plain {
            Self::Plain
        } else {
            Self::Bars
        }
    }
}

/// Run the simulation for every file in `args`.
pub async fn execute(settings: UploaderSettings, args: &SimulateArgs) -> Result<(), CliError> {
    let files = args
        .files
        .iter()
        .map(PathBuf::as_path)
        .map(describe_file)
        .collect::<Result<Vec<_>, _>>()?;

    let source = args
        .seed
        .map_or_else(RandomProgressSource::new, RandomProgressSource::seeded);
    let emitter = BroadcastUploadEmitter::default();
    let (notifier, mut notices) = ChannelNotificationSink::new();

    let manager = build_upload_manager(UploadManagerDeps {
        event_emitter: Arc::new(emitter.clone()),
        notifier: Arc::new(notifier),
        progress_source: Arc::new(source),
        settings,
    })?;

    let output = Output::from_args(args);
    let mut printer = match output {
        Output::Bars => QueueProgressPrinter::new(),
        Output::Plain | Output::Json => QueueProgressPrinter::plain(),
    };
    let mut entries = manager.subscribe();
    let mut events = emitter.subscribe();

    let report = manager.admit(files).await;
    if report.admitted.is_empty() {
        drain_notices(&mut notices, &printer, output);
        let names = report
            .rejected
            .iter()
            .filter_map(|e| e.file_name())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::Rejected(names));
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = entries.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = entries.borrow_and_update().clone();
                if output != Output::Json {
                    printer.render(&current);
                }
                if current.iter().all(UploadEntry::is_terminal) {
                    break;
                }
            }
            Some(notice) = notices.recv() => show_notice(&notice, &printer, output),
            event = events.recv(), if output == Output::Json => match event {
                Ok(event) => print_json(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event stream lagged");
                }
                Err(RecvError::Closed) => {}
            },
            _ = &mut ctrl_c => {
                let cancelled = manager.shutdown().await;
                printer.finish();
                tracing::info!(cancelled, "Interrupted");
                return Err(CliError::Interrupted);
            }
        }
    }

    if output == Output::Json {
        while let Ok(event) = events.try_recv() {
            print_json(&event);
        }
    }
    drain_notices(&mut notices, &printer, output);
    printer.finish();

    if output != Output::Json {
        println!("{}", summary(&manager));
    }
    Ok(())
}

fn show_notice(notice: &Notification, printer: &QueueProgressPrinter, output: Output) {
    match output {
        Output::Json => print_json(notice),
        Output::Bars | Output::Plain => printer.println(&format_notice(notice)),
    }
}

fn drain_notices(
    notices: &mut mpsc::UnboundedReceiver<Notification>,
    printer: &QueueProgressPrinter,
    output: Output,
) {
    while let Ok(notice) = notices.try_recv() {
        show_notice(&notice, printer, output);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!("Failed to serialize output: {}", e),
    }
}

/// Closing line, e.g. `2 of 2 files processed, 31 labels extracted`.
fn summary(manager: &UploadManager) -> String {
    summarize(&manager.snapshot())
}

fn summarize(entries: &[UploadEntry]) -> String {
    let completed: Vec<_> = entries
        .iter()
        .filter(|e| e.status == UploadStatus::Completed)
        .collect();
    let labels: u32 = completed.iter().filter_map(|e| e.result_count).sum();

    format!(
        "{} of {} files processed, {labels} labels extracted",
        completed.len(),
        entries.len()
    )
}
