//! Cooperative stop signal shared by every processing loop

use log::{error, info};
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable stop flag.
///
/// Triggering is sticky: a loop that starts waiting after `trigger` was
/// called still observes it immediately.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Sets the flag and wakes every waiter. Safe to call repeatedly.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once `trigger` has been called
    pub async fn wait(&self) {
        let mut receiver = self.receiver.clone();
        while !*receiver.borrow_and_update() {
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }

    /// Triggers once `signal` fires.
    ///
    /// A signal that fails to install is logged and leaves the flag untouched.
    pub async fn trigger_on<F>(&self, signal: F)
    where
        F: Future<Output = io::Result<()>>,
    {
        match signal.await {
            Ok(()) => {
                info!("Received stop signal, shutting down gracefully...");
                self.trigger();
            }
            Err(e) => error!("Failed to listen for stop signal: {}", e),
        }
    }
}
