//! Per-download bookkeeping owned by the orchestrator for one `download` call.

use std::fmt;
use std::path::PathBuf;

use crate::reference::Reference;

/// Lifecycle of one download job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Submitting,
    AwaitingMetadata,
    Transferring,
    Completed,
    Cancelled,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Cancelled | JobState::Failed
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Idle => "idle",
            JobState::Submitting => "submitting",
            JobState::AwaitingMetadata => "awaiting-metadata",
            JobState::Transferring => "transferring",
            JobState::Completed => "completed",
            JobState::Cancelled => "cancelled",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub(super) struct DownloadJob {
    pub(super) reference: Reference,
    pub(super) destination: PathBuf,
    /// Unknown until metadata resolves.
    pub(super) total: Option<u64>,
    pub(super) bytes_completed: u64,
    pub(super) peers: usize,
    pub(super) bytes_per_sec: f64,
    pub(super) polls: u64,
    state: JobState,
}

impl DownloadJob {
    pub(super) fn new(reference: Reference, destination: PathBuf) -> Self {
        Self {
            reference,
            destination,
            total: None,
            bytes_completed: 0,
            peers: 0,
            bytes_per_sec: 0.0,
            polls: 0,
            state: JobState::Idle,
        }
    }

    pub(super) fn state(&self) -> JobState {
        self.state
    }

    pub(super) fn transition(&mut self, next: JobState) {
        debug_assert!(
            !self.state.is_terminal(),
            "transition out of terminal state {}",
            self.state
        );
        tracing::debug!(reference = %self.reference, from = %self.state, to = %next, "job state");
        self.state = next;
    }

    /// Record one statistics poll. Completed bytes never move backwards.
    pub(super) fn record_poll(&mut self, bytes_completed: u64, peers: usize, bytes_per_sec: f64) {
        self.polls += 1;
        if bytes_completed < self.bytes_completed {
            tracing::debug!(
                previous = self.bytes_completed,
                reported = bytes_completed,
                "engine reported fewer completed bytes than before"
            );
        }
        self.bytes_completed = self.bytes_completed.max(bytes_completed);
        self.peers = peers;
        self.bytes_per_sec = bytes_per_sec;
    }
}
