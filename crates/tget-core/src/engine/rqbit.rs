//! Transfer engine backed by a librqbit session.
//!
//! librqbit resolves magnet metadata while the torrent is being added, so a
//! submitted job only records what to add; `metadata_ready` performs the add
//! and waits for initialization.

use anyhow::anyhow;
use async_trait::async_trait;
use librqbit::{
    AddTorrent, AddTorrentOptions, ManagedTorrent, Session, SessionOptions, TorrentStatsState,
};
use std::path::Path;
use std::sync::Arc;

use super::{EngineClient, EngineError, EngineJob, EngineOptions, JobStats, TransferEngine};

/// Starts one librqbit session per download.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqbitEngine;

#[async_trait]
impl TransferEngine for RqbitEngine {
    type Client = RqbitClient;

    async fn start_client(&self, options: &EngineOptions) -> Result<RqbitClient, EngineError> {
        let session =
            Session::new_with_opts(options.download_dir.clone(), session_options(options))
                .await
                .map_err(|e| EngineError::new("create torrent session", e))?;
        tracing::debug!(
            dir = %options.download_dir.display(),
            seed = options.seed,
            "torrent session started"
        );
        Ok(RqbitClient { session })
    }
}

/// Seeding off means the session never uploads pieces.
fn session_options(options: &EngineOptions) -> SessionOptions {
    SessionOptions {
        disable_upload: !options.seed,
        ..Default::default()
    }
}

pub struct RqbitClient {
    session: Arc<Session>,
}

impl RqbitClient {
    fn job(&self, add: AddTorrent<'static>) -> RqbitJob {
        RqbitJob {
            session: Arc::clone(&self.session),
            pending: Some(add),
            handle: None,
        }
    }
}

#[async_trait]
impl EngineClient for RqbitClient {
    type Job = RqbitJob;

    async fn submit_local_file(&mut self, path: &Path) -> Result<RqbitJob, EngineError> {
        let filename = path.to_str().ok_or_else(|| {
            EngineError::new(
                "read torrent file",
                anyhow!("path is not valid UTF-8: {}", path.display()),
            )
        })?;
        let add = AddTorrent::from_local_filename(filename)
            .map_err(|e| EngineError::new("read torrent file", e))?;
        Ok(self.job(add))
    }

    async fn submit_magnet(&mut self, uri: &str) -> Result<RqbitJob, EngineError> {
        Ok(self.job(AddTorrent::from_url(uri.to_string())))
    }

    async fn close(self) {
        self.session.stop().await;
        tracing::debug!("torrent session stopped");
    }
}

pub struct RqbitJob {
    session: Arc<Session>,
    pending: Option<AddTorrent<'static>>,
    handle: Option<Arc<ManagedTorrent>>,
}

impl RqbitJob {
    fn handle(&self, context: &'static str) -> Result<&Arc<ManagedTorrent>, EngineError> {
        self.handle
            .as_ref()
            .ok_or_else(|| EngineError::new(context, anyhow!("metadata not resolved yet")))
    }
}

#[async_trait]
impl EngineJob for RqbitJob {
    async fn metadata_ready(&mut self) -> Result<(), EngineError> {
        if self.handle.is_some() {
            return Ok(());
        }
        let add = self.pending.take().ok_or_else(|| {
            EngineError::new("resolve metadata", anyhow!("torrent was already added"))
        })?;
        let options = AddTorrentOptions {
            overwrite: true,
            ..Default::default()
        };
        let response = self
            .session
            .add_torrent(add, Some(options))
            .await
            .map_err(|e| EngineError::new("add torrent", e))?;
        let handle = response
            .into_handle()
            .ok_or_else(|| EngineError::new("add torrent", anyhow!("session returned no handle")))?;
        handle
            .wait_until_initialized()
            .await
            .map_err(|e| EngineError::new("initialize torrent", e))?;
        self.handle = Some(handle);
        Ok(())
    }

    async fn begin_fetch_all(&mut self) -> Result<(), EngineError> {
        let handle = self.handle("start download")?;
        // Every file is selected at add time; only a paused torrent needs a kick.
        if matches!(handle.stats().state, TorrentStatsState::Paused) {
            self.session
                .unpause(handle)
                .await
                .map_err(|e| EngineError::new("start download", e))?;
        }
        Ok(())
    }

    fn name(&self) -> String {
        self.handle
            .as_ref()
            .and_then(|h| h.name())
            .unwrap_or_else(|| "unnamed torrent".to_string())
    }

    fn total_length(&self) -> u64 {
        self.handle.as_ref().map_or(0, |h| h.stats().total_bytes)
    }

    fn file_count(&self) -> usize {
        self.handle
            .as_ref()
            .map_or(0, |h| h.stats().file_progress.len())
    }

    fn stats(&self) -> Result<JobStats, EngineError> {
        let stats = self.handle("torrent stats")?.stats();
        if let Some(err) = stats.error {
            return Err(EngineError::new("torrent stats", anyhow!(err)));
        }
        let active_peers = stats
            .live
            .as_ref()
            .map_or(0, |live| live.snapshot.peer_stats.live);
        Ok(JobStats { active_peers })
    }

    fn bytes_completed(&self) -> u64 {
        self.handle.as_ref().map_or(0, |h| h.stats().progress_bytes)
    }
}
