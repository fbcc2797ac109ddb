//! Service network layer: event datagram intake and stage coordination

use crate::config::ServiceConfig;
use crate::events_handler::EventsHandler;
use crate::packet_queue::PacketQueue;
use crate::packets_handler::PacketsHandler;
use crate::shutdown::Shutdown;
use log::{debug, error, info, warn};
use shared::{Event, Standing};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Counters kept by the receive loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    pub datagrams: u64,
    pub events: u64,
    pub dropped: u64,
}

/// Splits a datagram into events, dropping lines that do not decode.
///
/// Returns the decoded events and the number of dropped lines.
pub fn decode_datagram(data: &[u8]) -> (Vec<Event>, u64) {
    let text = String::from_utf8_lossy(data);
    let mut events = Vec::new();
    let mut dropped = 0;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        match Event::decode(line) {
            Ok(event) => events.push(event),
            Err(_) => dropped += 1,
        }
    }

    (events, dropped)
}

/// Receives event datagrams and forwards decoded events to the events handler
pub struct EventReceiver {
    socket: UdpSocket,
    buffer_size: usize,
}

impl EventReceiver {
    pub async fn bind(
        addr: &str,
        buffer_size: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind(addr).await?;
        info!("Listening for events on {}", socket.local_addr()?);
        Ok(Self {
            socket,
            buffer_size,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self, events: mpsc::UnboundedSender<Event>, shutdown: Shutdown) -> ReceiverStats {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut stats = ReceiverStats::default();

        loop {
            let received = tokio::select! {
                result = self.socket.recv_from(&mut buffer) => result,
                _ = shutdown.wait() => break,
            };

            match received {
                Ok((len, _addr)) => {
                    stats.datagrams += 1;
                    let (decoded, dropped) = decode_datagram(&buffer[..len]);
                    stats.dropped += dropped;

                    for event in decoded {
                        if events.send(event).is_err() {
                            error!("Events handler is gone, stopping receiver");
                            return stats;
                        }
                        stats.events += 1;
                    }
                }
                Err(e) => {
                    warn!("Error receiving datagram: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }

        debug!(
            "Receiver stopped: {} datagrams, {} events, {} dropped",
            stats.datagrams, stats.events, stats.dropped
        );
        stats
    }
}

/// Final state reported once every stage has stopped
#[derive(Debug, Clone)]
pub struct ServiceReport {
    pub standings: Vec<Standing>,
    pub receiver: ReceiverStats,
    pub packets_sent: u64,
}

impl ServiceReport {
    /// Writes the final standings to `path` as a JSON array in rank order
    pub fn write_standings(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.standings)?;
        writer.flush()?;
        Ok(())
    }
}

/// Wires receive, event processing and packet sending into one service
pub struct Server {
    receiver: EventReceiver,
    packets_handler: PacketsHandler,
    packets: Arc<PacketQueue>,
    shutdown: Shutdown,
}

impl Server {
    pub async fn new(config: &ServiceConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let destination = config.destination().await?;
        Self::bind(&config.listen_address(), destination, config.buffer_size).await
    }

    pub async fn bind(
        listen: &str,
        destination: SocketAddr,
        buffer_size: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let packets = Arc::new(PacketQueue::new());
        let receiver = EventReceiver::bind(listen, buffer_size).await?;
        let packets_handler = PacketsHandler::bind(destination, Arc::clone(&packets)).await?;

        Ok(Server {
            receiver,
            packets_handler,
            packets,
            shutdown: Shutdown::new(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.receiver.local_addr()
    }

    /// Handle for stopping the running service from elsewhere
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Runs every stage until shutdown is triggered
    pub async fn run(self) -> Result<ServiceReport, Box<dyn std::error::Error>> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let receiver_handle = tokio::spawn(self.receiver.run(events_tx, self.shutdown.clone()));
        let events_handle = tokio::spawn(
            EventsHandler::new(Arc::clone(&self.packets)).run(events_rx, self.shutdown.clone()),
        );
        let packets_handle = tokio::spawn(self.packets_handler.run(self.shutdown.clone()));

        info!("Statistics service started");

        let receiver = receiver_handle.await?;
        let events_handler = events_handle.await?;
        let packets_sent = packets_handle.await?;

        info!("Statistics service stopped");

        Ok(ServiceReport {
            standings: events_handler.ranking().standings(),
            receiver,
            packets_sent,
        })
    }
}
