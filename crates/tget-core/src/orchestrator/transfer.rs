//! Transfer phase: fetch everything and poll the engine on a fixed interval.

use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::control::Cancellation;
use crate::engine::EngineJob;
use crate::progress::ProgressReporter;

use super::job::DownloadJob;
use super::DownloadError;

const LABEL: &str = "Downloading";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TransferEnd {
    Completed,
    Cancelled,
}

/// Poll until completed bytes reach the total, the engine errors, or `cancel`
/// fires. The first poll happens one `interval` after the bar appears.
pub(super) async fn run_transfer<J: EngineJob>(
    reporter: &mut ProgressReporter,
    engine_job: &mut J,
    job: &mut DownloadJob,
    interval: Duration,
    cancel: &Cancellation,
) -> Result<TransferEnd, DownloadError> {
    engine_job
        .begin_fetch_all()
        .await
        .map_err(DownloadError::Transfer)?;

    let total = engine_job.total_length();
    reporter.create_bar(total, LABEL);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() fires immediately; skip that one.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                reporter.abandon_bar();
                return Ok(TransferEnd::Cancelled);
            }
            _ = ticker.tick() => {}
        }

        let stats = match engine_job.stats() {
            Ok(stats) => stats,
            Err(e) => {
                reporter.abandon_bar();
                return Err(DownloadError::Transfer(e));
            }
        };
        let bytes = engine_job.bytes_completed();

        reporter.update_progress(bytes);
        reporter.display_stats(bytes, stats.active_peers, total);
        job.record_poll(bytes, stats.active_peers, reporter.throughput().unwrap_or(0.0));
        tracing::trace!(
            poll = job.polls,
            bytes = job.bytes_completed,
            peers = job.peers,
            rate = job.bytes_per_sec,
            "transfer poll"
        );

        if bytes >= total {
            if bytes > total {
                tracing::warn!(bytes, total, "engine reported more bytes than the total");
            }
            reporter.complete_bar();
            return Ok(TransferEnd::Completed);
        }
    }
}
