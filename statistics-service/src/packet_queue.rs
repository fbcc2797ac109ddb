//! Outbound packet queue between the events handler and the packets handler

use crate::shutdown::Shutdown;
use log::debug;
use shared::Packet;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// FIFO of packets waiting to be sent.
///
/// Single packets are appended. A broadcast batch replaces whatever is still
/// pending, so a slow sender only ever works through the latest broadcast
/// instead of an ever growing backlog.
#[derive(Debug, Default)]
pub struct PacketQueue {
    pending: Mutex<VecDeque<Packet>>,
    notify: Notify,
}

impl PacketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Packet>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put(&self, packet: Packet) {
        self.lock().push_back(packet);
        self.notify.notify_one();
    }

    /// Atomically swaps the pending packets for `packets`
    pub fn replace(&self, packets: Vec<Packet>) {
        {
            let mut pending = self.lock();
            if !pending.is_empty() {
                debug!("Discarding {} unsent packets", pending.len());
            }
            pending.clear();
            pending.extend(packets);
        }
        self.notify.notify_one();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn try_pop(&self) -> Option<Packet> {
        self.lock().pop_front()
    }

    /// Waits for the next packet.
    ///
    /// Returns `None` only once `shutdown` is triggered and nothing is left
    /// to take.
    pub async fn pop(&self, shutdown: &Shutdown) -> Option<Packet> {
        loop {
            if let Some(packet) = self.try_pop() {
                return Some(packet);
            }
            if shutdown.is_triggered() {
                return None;
            }

            tokio::select! {
                _ = self.notify.notified() => {}
                _ = shutdown.wait() => {}
            }
        }
    }
}
