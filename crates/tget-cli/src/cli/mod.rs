//! CLI for the tget torrent downloader.

mod prompt;
mod signals;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tget_core::config::{self, Config};
use tget_core::control::Cancellation;
use tget_core::engine::RqbitEngine;
use tget_core::orchestrator::{DownloadOutcome, Orchestrator};
use tget_core::progress::{ProgressReporter, Theme};
use tget_core::reference::{clean_input, Validator};

use ui::Ui;

/// Pause after a finished download so the final bar stays readable.
const SUCCESS_PAUSE: Duration = Duration::from_secs(1);

/// Top-level CLI for tget.
#[derive(Debug, Parser)]
#[command(name = "tget", version)]
#[command(about = "tget: download a torrent from a magnet link or .torrent file", long_about = None)]
pub struct Cli {
    /// Magnet link or path to a .torrent file. Prompted for when omitted.
    pub reference: Option<String>,

    /// Directory to save into (default: ~/Downloads).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not seed to other peers while the download runs.
    #[arg(long)]
    pub no_seed: bool,

    /// Milliseconds between progress updates (minimum 100).
    #[arg(long, value_name = "N")]
    pub interval_ms: Option<u64>,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(dir) = &self.output_dir {
            cfg = cfg.with_download_dir(dir);
        }
        if self.no_seed {
            cfg = cfg.with_seed(false);
        }
        if let Some(ms) = self.interval_ms {
            cfg = cfg.with_poll_interval_ms(ms);
        }
        cfg
    }
}

/// Parse arguments and run one download. Help and version exit 0; usage
/// errors exit 1 like every other failure.
pub async fn run_from_args() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let ui = Ui::new(Theme::default());
    ui.banner();
    match run(cli, &ui).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("tget failed: {:#}", err);
            ui.error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, ui: &Ui) -> Result<()> {
    let cfg = cli.apply(config::load().context("Configuration error")?);
    cfg.ensure_download_dir().context("Configuration error")?;
    let validator = Validator::new(&cfg).context("Configuration error")?;
    tracing::debug!("effective config: {:?}", cfg);

    let cancel = Cancellation::new();
    let signal_task = tokio::spawn(signals::cancel_on_signal(
        cancel.clone(),
        ui.theme().warning,
    ));

    let raw = match cli.reference {
        Some(raw) => raw,
        None => match prompt::read_reference().await? {
            Some(raw) => raw,
            None => {
                signal_task.abort();
                ui.info("No link entered.");
                return Ok(());
            }
        },
    };

    let input = clean_input(&raw);
    let reference = match validator.validate(&input) {
        Ok(reference) => reference,
        Err(err) => {
            signal_task.abort();
            return Err(err).context("Invalid link");
        }
    };
    ui.success("Valid link! Preparing download...");

    let reporter = ProgressReporter::new(ui.theme().clone());
    let mut orchestrator = Orchestrator::new(Arc::new(cfg), RqbitEngine, reporter);
    let outcome = orchestrator.download(reference, &cancel).await;
    signal_task.abort();

    match outcome.context("Download failed")? {
        DownloadOutcome::Completed(summary) => {
            ui.success(&format!(
                "Download complete! Saved to {}",
                summary.location.display()
            ));
            tokio::time::sleep(SUCCESS_PAUSE).await;
        }
        DownloadOutcome::Cancelled => {
            tracing::info!("download stopped by operator");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
