//! Command line configuration for the generator

use crate::event_generator::GeneratorSettings;
use clap::Parser;
use shared::{User, NANOS_PER_MINUTE};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Generates legal user event streams", long_about = None)]
pub struct GeneratorConfig {
    /// Simulated deal time to cover, in hours
    #[arg(long, default_value = "240")]
    pub hours: i64,

    /// File to write events to, one per line
    #[arg(short, long, default_value = "data.txt")]
    pub output: PathBuf,

    /// Send events as datagrams to this address instead of writing a file
    #[arg(short, long)]
    pub target: Option<SocketAddr>,

    /// Pause between datagrams in microseconds
    #[arg(short, long, default_value = "1")]
    pub delay_us: u64,

    /// Seed for a reproducible sequence
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stop after this many events
    #[arg(short = 'n', long)]
    pub max_events: Option<u64>,

    /// Lowest user id
    #[arg(long, default_value = "1")]
    pub min_user: User,

    /// Highest user id
    #[arg(long, default_value = "1000")]
    pub max_user: User,

    /// Lowest deal amount
    #[arg(long, default_value = "-1000", allow_negative_numbers = true)]
    pub min_amount: i64,

    /// Highest deal amount
    #[arg(long, default_value = "1000", allow_negative_numbers = true)]
    pub max_amount: i64,
}

impl GeneratorConfig {
    /// Value ranges for the generator; empty ranges are rejected
    pub fn settings(&self) -> Result<GeneratorSettings, String> {
        if self.min_user > self.max_user {
            return Err("--min-user must not exceed --max-user".to_string());
        }
        if self.min_amount > self.max_amount {
            return Err("--min-amount must not exceed --max-amount".to_string());
        }

        Ok(GeneratorSettings {
            min_user: self.min_user,
            max_user: self.max_user,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            ..GeneratorSettings::default()
        })
    }

    /// Deal clock value at which generation stops
    pub fn until(&self) -> i64 {
        self.hours.saturating_mul(60 * NANOS_PER_MINUTE)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_micros(self.delay_us)
    }
}
