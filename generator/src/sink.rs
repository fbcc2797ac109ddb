//! Destinations for generated events

use shared::Event;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::UdpSocket;
use tokio::time::sleep;

/// Where generated events end up: one line per event in a file, or one
/// datagram per event sent to the statistics service.
pub enum EventSink {
    File(BufWriter<File>),
    Udp {
        socket: UdpSocket,
        target: SocketAddr,
        delay: Duration,
    },
}

impl EventSink {
    pub async fn file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path).await?;
        Ok(EventSink::File(BufWriter::new(file)))
    }

    pub async fn udp(target: SocketAddr, delay: Duration) -> std::io::Result<Self> {
        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        Ok(EventSink::Udp {
            socket,
            target,
            delay,
        })
    }

    pub async fn write(&mut self, event: &Event) -> std::io::Result<()> {
        match self {
            EventSink::File(writer) => {
                writer.write_all(event.to_string().as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            EventSink::Udp {
                socket,
                target,
                delay,
            } => {
                socket.send_to(event.to_string().as_bytes(), *target).await?;
                // Pacing keeps the receiver's socket buffer from overflowing
                if !delay.is_zero() {
                    sleep(*delay).await;
                }
            }
        }
        Ok(())
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        if let EventSink::File(writer) = self {
            writer.flush().await?;
        }
        Ok(())
    }
}
