//! Command line configuration for the statistics service

use clap::Parser;
use shared::DATAGRAM_BUFFER_SIZE;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Live deal leaderboard over UDP", long_about = None)]
pub struct ServiceConfig {
    /// Address to bind the event socket to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port receiving event datagrams
    #[arg(short, long, default_value = "9000")]
    pub port: u16,

    /// Host receiving rank packets
    #[arg(short, long, default_value = "127.0.0.1")]
    pub dest_host: String,

    /// Port receiving rank packets
    #[arg(short = 'P', long, default_value = "9001")]
    pub dest_port: u16,

    /// Size of the datagram receive buffer in bytes
    #[arg(long, default_value_t = DATAGRAM_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Write the final standings as JSON to this file on shutdown
    #[arg(long)]
    pub standings_out: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the packet destination, accepting host names as well as addresses
    pub async fn destination(&self) -> io::Result<SocketAddr> {
        let target = format!("{}:{}", self.dest_host, self.dest_port);
        let found = tokio::net::lookup_host(&target).await?.next();
        found.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {}", target),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::try_parse_from(["statistics-service"]).unwrap();
        assert_eq!(config.listen_address(), "0.0.0.0:9000");
        assert_eq!(config.dest_host, "127.0.0.1");
        assert_eq!(config.dest_port, 9001);
        assert_eq!(config.buffer_size, DATAGRAM_BUFFER_SIZE);
        assert!(config.standings_out.is_none());
    }

    #[test]
    fn test_all_arguments() {
        let config = ServiceConfig::try_parse_from([
            "statistics-service",
            "-H",
            "127.0.0.1",
            "-p",
            "7000",
            "-d",
            "10.0.0.2",
            "-P",
            "7001",
            "--buffer-size",
            "4096",
            "--standings-out",
            "final.json",
        ])
        .unwrap();

        assert_eq!(config.listen_address(), "127.0.0.1:7000");
        assert_eq!(config.dest_host, "10.0.0.2");
        assert_eq!(config.dest_port, 7001);
        assert_eq!(config.buffer_size, 4096);
        assert_eq!(config.standings_out, Some(PathBuf::from("final.json")));
    }

    #[test]
    fn test_rejects_invalid_port() {
        let result = ServiceConfig::try_parse_from(["statistics-service", "-p", "99999"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_destination_resolves() {
        let config = ServiceConfig::try_parse_from(["statistics-service", "-P", "7777"]).unwrap();
        let destination = config.destination().await.unwrap();
        assert_eq!(destination, "127.0.0.1:7777".parse().unwrap());
    }

    #[tokio::test]
    async fn test_destination_without_host_fails() {
        let config = ServiceConfig::try_parse_from(["statistics-service", "-d", ""]).unwrap();
        assert!(config.destination().await.is_err());
    }
}
