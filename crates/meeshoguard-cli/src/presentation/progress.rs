//! CLI progress rendering for the upload queue.
//!
//! Pure sync, presentation-only module. Renders the ordered entry list
//! either as one indicatif bar per entry (terminal) or as one line per
//! status change (pipes, logs, `--plain`).

use std::collections::HashMap;
use std::io::{self, IsTerminal};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use meeshoguard_core::{UploadEntry, UploadId, UploadStatus};

/// Queue display that selects terminal or plain output.
pub struct QueueProgressPrinter {
    inner: QueueRender,
}

enum QueueRender {
    Fancy(FancyQueue),
    Plain(PlainQueue),
}

impl QueueProgressPrinter {
    /// Create a printer, auto-detecting terminal capability.
    pub fn new() -> Self {
        if io::stdout().is_terminal() {
            Self::fancy()
        } else {
            Self::plain()
        }
    }

    /// Bars drawn to stdout.
    pub fn fancy() -> Self {
        Self {
            inner: QueueRender::Fancy(FancyQueue::new()),
        }
    }

    /// Line-per-change output.
    pub fn plain() -> Self {
        Self {
            inner: QueueRender::Plain(PlainQueue::default()),
        }
    }

    /// Redraw for the latest entry list.
    pub fn render(&mut self, entries: &[UploadEntry]) {
        match &mut self.inner {
            QueueRender::Fancy(inner) => inner.render(entries),
            QueueRender::Plain(inner) => {
                for line in inner.changes(entries) {
                    println!("{line}");
                }
            }
        }
    }

    /// Print a line without tearing the bars.
    pub fn println(&self, line: &str) {
        match &self.inner {
            QueueRender::Fancy(inner) => inner.println(line),
            QueueRender::Plain(_) => println!("{line}"),
        }
    }

    /// Stop drawing; unfinished bars stay where they are.
    pub fn finish(&mut self) {
        if let QueueRender::Fancy(inner) = &mut self.inner {
            inner.finish();
        }
    }
}

impl Default for QueueProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Fancy Terminal Progress (indicatif)
// ============================================================================

struct FancyQueue {
    multi: MultiProgress,
    bars: HashMap<UploadId, ProgressBar>,
}

impl FancyQueue {
    fn new() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::stdout()),
            bars: HashMap::new(),
        }
    }

    fn render(&mut self, entries: &[UploadEntry]) {
        self.bars.retain(|id, bar| {
            let keep = entries.iter().any(|e| &e.id == id);
            if !keep {
                bar.finish_and_clear();
                self.multi.remove(bar);
            }
            keep
        });

        for entry in entries {
            let bar = self.bars.entry(entry.id.clone()).or_insert_with(|| {
                let bar = self.multi.add(ProgressBar::new(100));
                bar.set_style(Self::bar_style());
                bar.set_prefix(format!("{} ({})", entry.name, entry.formatted_size()));
                bar
            });

            if bar.is_finished() {
                continue;
            }

            bar.set_position(u64::from(entry.display_progress()));
            if entry.is_terminal() {
                bar.finish_with_message(entry.status_caption());
            } else {
                bar.set_message(entry.status_caption());
            }
        }
    }

    fn println(&self, line: &str) {
        if self.multi.println(line).is_err() {
            println!("{line}");
        }
    }

    fn finish(&mut self) {
        for bar in self.bars.values() {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:<32!} {bar:28.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

// ============================================================================
// Plain Progress (non-terminal)
// ============================================================================

#[derive(Default)]
struct PlainQueue {
    /// Last printed status and display name per entry.
    seen: HashMap<UploadId, (UploadStatus, String)>,
}

impl PlainQueue {
    /// Lines for entries that appeared, changed status, or disappeared.
    fn changes(&mut self, entries: &[UploadEntry]) -> Vec<String> {
        let mut lines = Vec::new();

        for entry in entries {
            if self.seen.get(&entry.id).map(|(status, _)| *status) != Some(entry.status) {
                self.seen
                    .insert(entry.id.clone(), (entry.status, entry.name.clone()));
                lines.push(format!(
                    "{} ({}): {}",
                    entry.name,
                    entry.formatted_size(),
                    entry.status_caption()
                ));
            }
        }

        self.seen.retain(|id, (_, name)| {
            let keep = entries.iter().any(|e| &e.id == id);
            if !keep {
                lines.push(format!("{name}: removed"));
            }
            keep
        });

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meeshoguard_core::FileDescriptor;

    fn entry(name: &str, status: UploadStatus, result_count: Option<u32>) -> UploadEntry {
        let mut entry = UploadEntry::admitted(UploadId::new(name), &FileDescriptor::pdf(name, 1536));
        entry.status = status;
        entry.result_count = result_count;
        entry
    }

    #[test]
    fn test_plain_reports_status_changes_once() {
        let mut plain = PlainQueue::default();

        let lines = plain.changes(&[entry("a.pdf", UploadStatus::Uploading, None)]);
        assert_eq!(lines, vec!["a.pdf (1.5 KB): Uploading..."]);

        let mut progressed = entry("a.pdf", UploadStatus::Uploading, None);
        progressed.progress = 40.0;
        assert!(plain.changes(&[progressed]).is_empty());

        let lines = plain.changes(&[entry("a.pdf", UploadStatus::Completed, Some(9))]);
        assert_eq!(lines, vec!["a.pdf (1.5 KB): 9 labels extracted"]);
    }

    #[test]
    fn test_plain_reports_removal() {
        let mut plain = PlainQueue::default();
        plain.changes(&[
            entry("a.pdf", UploadStatus::Uploading, None),
            entry("b.pdf", UploadStatus::Uploading, None),
        ]);

        let lines = plain.changes(&[entry("b.pdf", UploadStatus::Uploading, None)]);
        assert_eq!(lines, vec!["a.pdf: removed"]);
    }

    #[test]
    fn test_fancy_tracks_one_bar_per_entry() {
        let mut fancy = FancyQueue {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            bars: HashMap::new(),
        };

        fancy.render(&[
            entry("a.pdf", UploadStatus::Uploading, None),
            entry("b.pdf", UploadStatus::Completed, Some(5)),
        ]);
        assert_eq!(fancy.bars.len(), 2);
        assert!(fancy.bars[&UploadId::new("b.pdf")].is_finished());

        fancy.render(&[entry("b.pdf", UploadStatus::Completed, Some(5))]);
        assert_eq!(fancy.bars.len(), 1);
    }
}
