//! Download orchestration: the state machine for one job.
//!
//! `Idle → Submitting → AwaitingMetadata → Transferring → {Completed | Cancelled | Failed}`.
//! The engine client is started once per `download` call and closed on every
//! exit path before the call returns.

mod job;
mod metadata;
mod transfer;

pub use job::JobState;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::control::Cancellation;
use crate::engine::{EngineClient, EngineError, EngineJob, EngineOptions, TransferEngine};
use crate::progress::ProgressReporter;
use crate::reference::{Reference, ReferenceKind};

use self::job::DownloadJob;
use self::metadata::{await_metadata, MetadataWait};
use self::transfer::{run_transfer, TransferEnd};

/// Why a download failed. Cancellation is not an error; see [`DownloadOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("create download directory {}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("start transfer engine")]
    EngineStart(#[source] EngineError),
    #[error("{kind} references are not supported; use a magnet link or a local torrent file")]
    UnsupportedReferenceKind { kind: &'static str },
    #[error("submit torrent")]
    Submission(#[source] EngineError),
    #[error("fetch metadata")]
    Metadata(#[source] EngineError),
    #[error("transfer")]
    Transfer(#[source] EngineError),
}

/// What a finished download looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub name: String,
    pub total_bytes: u64,
    pub file_count: usize,
    pub location: PathBuf,
}

/// Non-error end states of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed(DownloadSummary),
    /// The cancellation signal fired before completion.
    Cancelled,
}

/// Drives one download at a time through the engine, rendering via the reporter.
pub struct Orchestrator<E: TransferEngine> {
    config: Arc<Config>,
    engine: E,
    reporter: ProgressReporter,
}

impl<E: TransferEngine> Orchestrator<E> {
    pub fn new(config: Arc<Config>, engine: E, reporter: ProgressReporter) -> Self {
        Self {
            config,
            engine,
            reporter,
        }
    }

    pub fn reporter(&self) -> &ProgressReporter {
        &self.reporter
    }

    /// Download `reference` into the configured directory until it completes,
    /// fails, or `cancel` fires.
    pub async fn download(
        &mut self,
        reference: Reference,
        cancel: &Cancellation,
    ) -> Result<DownloadOutcome, DownloadError> {
        let mut job = DownloadJob::new(reference, self.config.download_dir.clone());
        tracing::info!(reference = %job.reference, dir = %job.destination.display(), "download requested");

        let result = self.run(&mut job, cancel).await;
        match &result {
            Ok(DownloadOutcome::Completed(summary)) => {
                job.transition(JobState::Completed);
                tracing::info!(
                    name = %summary.name,
                    bytes = summary.total_bytes,
                    polls = job.polls,
                    "download completed"
                );
            }
            Ok(DownloadOutcome::Cancelled) => {
                job.transition(JobState::Cancelled);
                tracing::info!(bytes = job.bytes_completed, "download cancelled");
            }
            Err(e) => {
                job.transition(JobState::Failed);
                tracing::warn!(error = %error_chain(e), "download failed");
            }
        }
        debug_assert!(job.state().is_terminal());
        result
    }

    async fn run(
        &mut self,
        job: &mut DownloadJob,
        cancel: &Cancellation,
    ) -> Result<DownloadOutcome, DownloadError> {
        job.transition(JobState::Submitting);
        ensure_dir(&job.destination)
            .await
            .map_err(|source| DownloadError::Storage {
                path: job.destination.clone(),
                source,
            })?;

        let options = EngineOptions {
            download_dir: job.destination.clone(),
            seed: self.config.seed,
        };
        let mut client = self
            .engine
            .start_client(&options)
            .await
            .map_err(DownloadError::EngineStart)?;

        let result = self.drive(&mut client, job, cancel).await;
        client.close().await;
        tracing::debug!("engine client closed");
        result
    }

    async fn drive(
        &mut self,
        client: &mut E::Client,
        job: &mut DownloadJob,
        cancel: &Cancellation,
    ) -> Result<DownloadOutcome, DownloadError> {
        let mut engine_job = submit(client, job.reference.kind()).await?;
        job.transition(JobState::AwaitingMetadata);

        let wait = await_metadata(
            &mut self.reporter,
            &mut engine_job,
            cancel,
            self.config.metadata_tick(),
        )
        .await
        .map_err(DownloadError::Metadata)?;
        if wait == MetadataWait::Cancelled {
            return Ok(DownloadOutcome::Cancelled);
        }

        let name = engine_job.name();
        let total = engine_job.total_length();
        let file_count = engine_job.file_count();
        let location = job.destination.join(&name);
        job.total = Some(total);
        self.reporter
            .show_job_info(&name, total, file_count, &location);

        job.transition(JobState::Transferring);
        let end = run_transfer(
            &mut self.reporter,
            &mut engine_job,
            job,
            self.config.poll_interval(),
            cancel,
        )
        .await?;

        Ok(match end {
            TransferEnd::Completed => DownloadOutcome::Completed(DownloadSummary {
                name,
                total_bytes: job.total.unwrap_or(total),
                file_count,
                location,
            }),
            TransferEnd::Cancelled => DownloadOutcome::Cancelled,
        })
    }
}

/// Hand the reference to the engine according to its kind.
async fn submit<C: EngineClient>(
    client: &mut C,
    kind: &ReferenceKind,
) -> Result<C::Job, DownloadError> {
    match kind {
        ReferenceKind::LocalDescriptor(path) => client
            .submit_local_file(path)
            .await
            .map_err(DownloadError::Submission),
        ReferenceKind::Magnet(uri) => client
            .submit_magnet(uri)
            .await
            .map_err(DownloadError::Submission),
        ReferenceKind::RemoteDescriptor(_) => Err(DownloadError::UnsupportedReferenceKind {
            kind: "remote torrent URL",
        }),
    }
}

/// Create `path` and its parents (0755 on Unix) when missing.
async fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
        return Ok(());
    }
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(path).await
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}
