//! Interactive link prompt used when no reference is given on the command line.

use anyhow::{Context, Result};
use inquire::{InquireError, Text};

/// Ask for a link. `Ok(None)` when the operator backs out with Esc or Ctrl-C.
pub async fn read_reference() -> Result<Option<String>> {
    let answer = tokio::task::spawn_blocking(|| {
        Text::new("Magnet link or .torrent file:")
            .with_help_message("Paste a magnet link or drag a .torrent file here (Esc to quit)")
            .prompt()
    })
    .await
    .context("prompt task")?;

    interpret(answer)
}

fn interpret(answer: Result<String, InquireError>) -> Result<Option<String>> {
    match answer {
        Ok(raw) => Ok(Some(raw)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("read link"),
    }
}
