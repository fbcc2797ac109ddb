//! Renders rank packets and sends them to the configured destination

use crate::packet_queue::PacketQueue;
use crate::shutdown::Shutdown;
use log::{error, info};
use shared::Packet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub struct PacketsHandler {
    socket: UdpSocket,
    destination: SocketAddr,
    queue: Arc<PacketQueue>,
}

impl PacketsHandler {
    /// Binds an ephemeral local socket of the same address family as `destination`
    pub async fn bind(
        destination: SocketAddr,
        queue: Arc<PacketQueue>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let local = if destination.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(local).await?;
        info!(
            "Sending packets from {} to {}",
            socket.local_addr()?,
            destination
        );

        Ok(Self {
            socket,
            destination,
            queue,
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Sends queued packets until `shutdown` fires and the queue is empty.
    ///
    /// Returns the number of packets handed to the socket.
    pub async fn run(self, shutdown: Shutdown) -> u64 {
        let mut sent = 0;

        while let Some(packet) = self.queue.pop(&shutdown).await {
            // Datagram delivery is best effort, failures are only logged
            if let Err(e) = self.send(&packet).await {
                error!("Failed to send packet for user {}: {}", packet.user, e);
                continue;
            }
            sent += 1;
        }

        info!("Packets handler stopped after sending {} packets", sent);
        sent
    }

    async fn send(&self, packet: &Packet) -> std::io::Result<()> {
        let data = packet.to_string();
        self.socket.send_to(data.as_bytes(), self.destination).await?;
        Ok(())
    }
}
