//! Metadata phase: wait for the engine while a spinner ticks, unless cancelled first.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::control::Cancellation;
use crate::engine::{EngineError, EngineJob};
use crate::progress::{MetadataTicker, ProgressReporter};

const LABEL: &str = "Fetching metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MetadataWait {
    Ready,
    Cancelled,
}

/// Races the engine's metadata future against `cancel`. The spinner runs in its
/// own task for the duration and is stopped before this returns.
pub(super) async fn await_metadata<J: EngineJob>(
    reporter: &mut ProgressReporter,
    job: &mut J,
    cancel: &Cancellation,
    tick: Duration,
) -> Result<MetadataWait, EngineError> {
    reporter.show_metadata_loader(LABEL);
    let stop = cancel.child_token();
    let spinner = reporter
        .metadata_ticker()
        .map(|ticker| tokio::spawn(spin(ticker, tick, stop.clone())));

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Ok(MetadataWait::Cancelled),
        ready = job.metadata_ready() => ready.map(|()| MetadataWait::Ready),
    };

    stop.cancel();
    if let Some(task) = spinner {
        if let Err(e) = task.await {
            tracing::debug!("metadata spinner task: {}", e);
        }
    }

    match result {
        Ok(MetadataWait::Ready) => {
            reporter.complete_metadata_loader();
            tracing::debug!("metadata ready");
        }
        Ok(MetadataWait::Cancelled) => {
            reporter.clear_metadata_loader();
            tracing::debug!("metadata wait cancelled");
        }
        Err(_) => reporter.clear_metadata_loader(),
    }
    result
}

async fn spin(ticker: MetadataTicker, every: Duration, stop: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = stop.cancelled() => return,
            _ = interval.tick() => ticker.tick(),
        }
    }
}
