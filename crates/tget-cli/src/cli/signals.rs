//! Process signals → cancellation.

use anyhow::{Context, Result};
use tget_core::control::Cancellation;
use tget_core::progress::Paint;

/// Wait for SIGINT or SIGTERM (Ctrl-C elsewhere), warn, then cancel once.
pub async fn cancel_on_signal(cancel: Cancellation, warning: Paint) {
    if let Err(err) = shutdown_signal().await {
        tracing::warn!("signal handling unavailable: {:#}", err);
        return;
    }
    eprintln!();
    eprintln!("{}", warning.paint("⚠ Stopping download..."));
    cancel.cancel();
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term =
            signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
        tokio::select! {
            res = &mut ctrl_c => res.context("failed to listen for Ctrl-C")?,
            _ = term.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.context("failed to listen for Ctrl-C")
    }
}
