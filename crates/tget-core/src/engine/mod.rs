//! Transfer-engine seam.
//!
//! The peer protocol, piece selection, DHT and disk I/O all live behind these
//! traits. The orchestrator only starts a client, submits one reference, waits
//! for metadata and polls counters. [`rqbit`] implements them on librqbit.

pub mod rqbit;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use rqbit::RqbitEngine;

/// Error surfaced by an engine implementation, with the operation that failed.
#[derive(Debug, thiserror::Error)]
#[error("{context}")]
pub struct EngineError {
    pub context: &'static str,
    #[source]
    pub source: anyhow::Error,
}

impl EngineError {
    pub fn new(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self {
            context,
            source: source.into(),
        }
    }
}

/// Options for one engine client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Directory content is written into.
    pub download_dir: PathBuf,
    /// Keep serving pieces to peers while the client is open.
    pub seed: bool,
}

/// Statistics sampled on each poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStats {
    pub active_peers: usize,
}

/// Factory for engine clients. One client per download.
#[async_trait]
pub trait TransferEngine: Send + Sync {
    type Client: EngineClient;

    async fn start_client(&self, options: &EngineOptions) -> Result<Self::Client, EngineError>;
}

/// A running engine instance. Must be closed when the download ends.
#[async_trait]
pub trait EngineClient: Send {
    type Job: EngineJob;

    async fn submit_local_file(&mut self, path: &Path) -> Result<Self::Job, EngineError>;

    async fn submit_magnet(&mut self, uri: &str) -> Result<Self::Job, EngineError>;

    /// Release the client and everything it owns.
    async fn close(self);
}

/// One submitted transfer.
#[async_trait]
pub trait EngineJob: Send {
    /// Resolves once name, size and file layout are known. May never resolve.
    async fn metadata_ready(&mut self) -> Result<(), EngineError>;

    /// Start fetching every piece of every file.
    async fn begin_fetch_all(&mut self) -> Result<(), EngineError>;

    fn name(&self) -> String;

    fn total_length(&self) -> u64;

    fn file_count(&self) -> usize;

    fn stats(&self) -> Result<JobStats, EngineError>;

    fn bytes_completed(&self) -> u64;
}
