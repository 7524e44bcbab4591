//! OS signal handling.
//!
//! SIGINT and SIGTERM stop the bot. Uses Tokio's signal
//! handling, so it is async-safe.

use crate::lifecycle::stop::StopHandle;

/// Wait for SIGINT or SIGTERM, then stop through `handle`.
pub async fn stop_on_signal(handle: StopHandle) {
    wait_for_signal().await;
    tracing::info!("Stop signal received");
    handle.stop();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cannot install SIGTERM handler, listening for Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
