//! Progress reporting: metadata spinner, transfer bar and live statistics.
//!
//! The two indicators are sequential: the spinner runs while the engine
//! resolves metadata, then the determinate bar tracks completed bytes. Nothing
//! here returns an error; odd inputs (zero totals, calls before a bar exists,
//! repeated completion) leave a visible but harmless state.

mod theme;
mod throughput;

pub use theme::{Paint, Theme};
pub use throughput::{format_rate, ProgressSample, ThroughputMeter, MIN_SAMPLE_SPACING};

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// What the transfer bar's status line currently says.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferStatus {
    /// Bar created, no statistics yet.
    Starting,
    WaitingForPeers,
    Live { peers: usize, bytes_per_sec: f64 },
    Completed,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Starting => write!(f, "Starting..."),
            TransferStatus::WaitingForPeers => write!(f, "⚠️  Waiting for peers..."),
            TransferStatus::Live {
                peers,
                bytes_per_sec,
            } => write!(f, "📶 Peers: {} | 🚀 {}", peers, format_rate(*bytes_per_sec)),
            TransferStatus::Completed => write!(f, "Completed!"),
        }
    }
}

/// Handle the metadata ticking task advances. Cloning shares the spinner.
#[derive(Debug, Clone)]
pub struct MetadataTicker(ProgressBar);

impl MetadataTicker {
    pub fn tick(&self) {
        self.0.inc(1);
    }
}

struct TransferBar {
    bar: ProgressBar,
    label: String,
    meter: ThroughputMeter,
    status: TransferStatus,
    finished: bool,
}

/// Renders both progress phases for one download.
pub struct ProgressReporter {
    theme: Theme,
    hidden: bool,
    metadata: Option<ProgressBar>,
    /// Spinner position when the last metadata loader was removed.
    metadata_ticks: Option<u64>,
    transfer: Option<TransferBar>,
}

impl ProgressReporter {
    /// Reporter drawing to stderr.
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            hidden: false,
            metadata: None,
            metadata_ticks: None,
            transfer: None,
        }
    }

    /// Reporter that tracks state but draws nothing.
    pub fn hidden(theme: Theme) -> Self {
        Self {
            hidden: true,
            ..Self::new(theme)
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn draw_target(&self) -> ProgressDrawTarget {
        if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        }
    }

    fn style(template: &str) -> ProgressStyle {
        ProgressStyle::with_template(template).unwrap_or_else(|e| {
            tracing::warn!("invalid progress template {:?}: {}", template, e);
            ProgressStyle::default_bar()
        })
    }

    /// Start the indeterminate metadata spinner, replacing any previous one.
    pub fn show_metadata_loader(&mut self, label: &str) {
        self.clear_metadata_loader();
        let spinner = ProgressBar::with_draw_target(None, self.draw_target());
        spinner.set_style(Self::style(self.theme.spinner_template));
        spinner.set_message(label.to_string());
        self.metadata = Some(spinner);
    }

    /// Handle for the ticking task; `None` when no spinner is showing.
    pub fn metadata_ticker(&self) -> Option<MetadataTicker> {
        self.metadata.clone().map(MetadataTicker)
    }

    pub fn metadata_active(&self) -> bool {
        self.metadata.is_some()
    }

    /// How many times the last finished spinner was ticked.
    pub fn metadata_ticks(&self) -> Option<u64> {
        self.metadata_ticks
    }

    /// Finish the spinner with a confirmation line.
    pub fn complete_metadata_loader(&mut self) {
        if let Some(spinner) = self.metadata.take() {
            let label = spinner.message();
            self.metadata_ticks = Some(spinner.position());
            spinner.finish_and_clear();
            if !self.hidden {
                eprintln!("{} {}", self.theme.success.paint("✔"), label);
            }
        }
    }

    /// Remove the spinner without confirmation (cancellation or failure).
    pub fn clear_metadata_loader(&mut self) {
        if let Some(spinner) = self.metadata.take() {
            self.metadata_ticks = Some(spinner.position());
            spinner.finish_and_clear();
        }
    }

    /// Print what is about to be downloaded.
    pub fn show_job_info(&self, name: &str, total: u64, file_count: usize, path: &Path) {
        if self.hidden {
            return;
        }
        let t = &self.theme;
        println!();
        println!("{}", t.info.paint("📝 Torrent details:"));
        println!("   {} {}", t.highlight.paint("Name:"), name);
        println!("   {} {}", t.highlight.paint("Size:"), HumanBytes(total));
        println!("   {} {}", t.highlight.paint("Files:"), file_count);
        println!("   {} {}", t.highlight.paint("Saving to:"), path.display());
        println!();
    }

    /// Create the determinate bar for `total` bytes. Resets the throughput meter.
    pub fn create_bar(&mut self, total: u64, label: &str) {
        self.create_bar_at(total, label, Instant::now());
    }

    pub(crate) fn create_bar_at(&mut self, total: u64, label: &str, now: Instant) {
        if let Some(old) = self.transfer.take() {
            if !old.finished {
                old.bar.abandon();
            }
        }
        let bar = ProgressBar::with_draw_target(Some(total), self.draw_target());
        bar.set_style(Self::style(self.theme.bar_template).progress_chars(self.theme.bar_chars));
        let status = TransferStatus::Starting;
        bar.set_message(format!("{} | {}", label, status));
        self.transfer = Some(TransferBar {
            bar,
            label: label.to_string(),
            meter: ThroughputMeter::new(ProgressSample::new(0, now)),
            status,
            finished: false,
        });
    }

    pub fn transfer_started(&self) -> bool {
        self.transfer.is_some()
    }

    /// Move the bar to `bytes_completed`.
    pub fn update_progress(&mut self, bytes_completed: u64) {
        if let Some(t) = self.transfer.as_mut() {
            if !t.finished {
                t.bar.set_position(bytes_completed);
            }
        }
    }

    /// Recompute throughput and refresh the status line.
    pub fn display_stats(&mut self, bytes_completed: u64, peers: usize, total: u64) {
        self.display_stats_at(bytes_completed, peers, total, Instant::now());
    }

    pub(crate) fn display_stats_at(
        &mut self,
        bytes_completed: u64,
        peers: usize,
        total: u64,
        now: Instant,
    ) {
        let Some(t) = self.transfer.as_mut() else {
            tracing::trace!("display_stats before create_bar ignored");
            return;
        };
        let bytes_per_sec = t
            .meter
            .record(ProgressSample::new(bytes_completed, now));

        t.status = if peers == 0 && bytes_completed < total {
            TransferStatus::WaitingForPeers
        } else if bytes_completed < total {
            TransferStatus::Live {
                peers,
                bytes_per_sec,
            }
        } else {
            TransferStatus::Completed
        };
        if !t.finished {
            t.bar.set_message(format!("{} | {}", t.label, t.status));
        }
    }

    pub fn status(&self) -> Option<&TransferStatus> {
        self.transfer.as_ref().map(|t| &t.status)
    }

    pub fn position(&self) -> Option<u64> {
        self.transfer.as_ref().map(|t| t.bar.position())
    }

    pub fn throughput(&self) -> Option<f64> {
        self.transfer.as_ref().map(|t| t.meter.bytes_per_sec())
    }

    /// Finish the bar. Later calls do nothing.
    pub fn complete_bar(&mut self) {
        if let Some(t) = self.transfer.as_mut() {
            if t.finished {
                return;
            }
            t.bar.finish();
            t.finished = true;
        }
    }

    /// Leave the bar where it stopped (cancellation or failure). Later calls do nothing.
    pub fn abandon_bar(&mut self) {
        if let Some(t) = self.transfer.as_mut() {
            if t.finished {
                return;
            }
            t.bar.abandon();
            t.finished = true;
        }
    }

    pub fn bar_finished(&self) -> bool {
        self.transfer.as_ref().is_some_and(|t| t.finished)
    }
}

#[cfg(test)]
mod tests;
