//! Process-wide configuration: built-in defaults, an optional read-only
//! `config.toml` overlay, and the destination directory check.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Magnet prefix followed by a 32-40 character info hash, ASCII case-insensitive.
pub const DEFAULT_MAGNET_PATTERN: &str = r"(?i-u)^magnet:\?xt=urn:btih:[a-z0-9]{32,40}(&|$)";

/// Extension a descriptor file (local or remote) must carry.
pub const DEFAULT_DESCRIPTOR_EXTENSION: &str = ".torrent";

/// Polls faster than this are clamped; the throughput meter ignores closer samples anyway.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid magnet pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("download directory {} is not writable", .path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("locate xdg base directories")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

/// Immutable settings shared (via `Arc`) by the validator and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the engine writes content into.
    pub download_dir: PathBuf,
    /// Keep uploading to peers while the job runs.
    pub seed: bool,
    /// Interval between engine statistics polls during transfer, in milliseconds.
    pub poll_interval_ms: u64,
    /// Spinner cadence while waiting for metadata, in milliseconds.
    pub metadata_tick_ms: u64,
    /// Regex a magnet reference must match.
    pub magnet_pattern: String,
    /// Required descriptor extension, including the leading dot.
    pub descriptor_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            seed: true,
            poll_interval_ms: 1000,
            metadata_tick_ms: 100,
            magnet_pattern: DEFAULT_MAGNET_PATTERN.to_string(),
            descriptor_extension: DEFAULT_DESCRIPTOR_EXTENSION.to_string(),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn metadata_tick(&self) -> Duration {
        Duration::from_millis(self.metadata_tick_ms.max(1))
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms.max(MIN_POLL_INTERVAL_MS);
        self
    }

    /// Creates the download directory (and parents) when missing.
    pub fn ensure_download_dir(&self) -> Result<(), ConfigError> {
        ensure_dir_sync(&self.download_dir).map_err(|source| ConfigError::DestinationUnwritable {
            path: self.download_dir.clone(),
            source,
        })
    }
}

/// `$HOME/Downloads`, or `Downloads` relative to the working directory when HOME is unset.
pub fn default_download_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("Downloads")
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tget")?;
    Ok(xdg_dirs.get_config_home().join("config.toml"))
}

/// Load defaults, overlaid with `~/.config/tget/config.toml` when it exists.
/// The file is never created or written.
pub fn load() -> Result<Config, ConfigError> {
    let path = config_path()?;
    let cfg = load_from_path(&path)?.unwrap_or_default();
    tracing::debug!(path = %path.display(), "resolved configuration: {:?}", cfg);
    Ok(cfg)
}

/// Reads and parses `path`; `Ok(None)` when the file does not exist.
pub fn load_from_path(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("loaded config from {}", path.display());
    Ok(Some(cfg))
}

fn ensure_dir_sync(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}
