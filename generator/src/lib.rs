//! # Event Generator Library
//!
//! Load and test tool for the statistics service. It produces an endless,
//! legal stream of user lifecycle events and writes it either to a file, one
//! event per line, or straight to the service as UDP datagrams.
//!
//! ## Lifecycle Rules
//!
//! Every generated event is valid for the state its user is in:
//! - an unknown user can only register
//! - a registered user that is offline can only connect
//! - a connected user can rename, win a deal, or disconnect
//!
//! ## Time
//!
//! Deal timestamps come from a simulated clock that starts at zero and moves
//! forward by a random step of up to one second per deal. The generator runs
//! until the clock passes the requested duration, so a 240 hour run crosses
//! at least one weekly reset on the service side.
//!
//! ## Module Organization
//!
//! - `config`: command line options and value ranges
//! - `event_generator`: the random lifecycle state machine
//! - `sink`: file and UDP outputs
//!
//! ## Usage Example
//!
//! ```rust
//! use generator::event_generator::{EventGenerator, GeneratorSettings};
//!
//! let mut generator = EventGenerator::from_seed(1, GeneratorSettings::default());
//! let first = generator.next_event();
//! assert_eq!(first.event_type(), shared::EventType::UserRegistered);
//! ```

pub mod config;
pub mod event_generator;
pub mod sink;

use event_generator::EventGenerator;
use rand::Rng;
use sink::EventSink;

/// Writes events to `sink` until the deal clock reaches `until` or
/// `max_events` have been produced. Returns the number of events written.
pub async fn generate<R: Rng>(
    generator: &mut EventGenerator<R>,
    sink: &mut EventSink,
    until: i64,
    max_events: Option<u64>,
) -> std::io::Result<u64> {
    let mut written = 0;

    while generator.current_time() < until && max_events.map_or(true, |max| written < max) {
        let event = generator.next_event();
        sink.write(&event).await?;
        written += 1;
    }

    sink.flush().await?;
    Ok(written)
}
