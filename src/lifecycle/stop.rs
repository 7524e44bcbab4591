//! Stop signalling for the retweet loop.
//!
//! The stop flag is latched in a `watch` channel, so a [`StopSignal`] taken
//! after [`StopHandle::stop`] still observes the stop. The bot can therefore
//! subscribe at any point relative to the signal task.

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side: flips the stop flag once.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal for one consumer.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request a stop. Later calls are no-ops.
    pub fn stop(&self) {
        // send_replace stores the flag even with no live receivers.
        if !self.tx.send_replace(true) {
            tracing::debug!(consumers = self.tx.receiver_count(), "Stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side, awaited inside `tokio::select!`.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested.
    ///
    /// If every handle is dropped without stopping, this never resolves.
    pub async fn stopped(&mut self) {
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
