//! Job control: the process-wide cancellation source.
//!
//! A single `Cancellation` is created at process start. The signal handler is
//! its only writer and triggers it once; the orchestrator's waits (metadata,
//! poll ticks, spinner task) observe it cooperatively.

use tokio_util::sync::CancellationToken;

/// Shared, idempotent cancellation signal. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `true` only for the call that set it;
    /// later calls are no-ops.
    pub fn cancel(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();
        tracing::info!("cancellation requested");
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Token cancelled together with this source, or on its own (e.g. to stop a
    /// phase-local task without cancelling the whole job).
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}
