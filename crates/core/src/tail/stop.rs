//! Caller-facing cancellation for tail sessions.
//!
//! A tail session observes its [`StopSignal`] at every await point, so a
//! caller holding the paired [`StopHandle`] can abort an otherwise
//! unbounded tail. Dropping the handle also stops the session.

use tokio::sync::watch;

/// Create a connected stop handle/signal pair.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Caller-held handle that stops the associated tail session.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Request the session to stop at its next await point.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observed by a tail session; fires once the handle stops or is dropped.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether a stop has been requested or the handle has been dropped.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Wait until a stop is requested or the handle is dropped.
    pub async fn stopped(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
