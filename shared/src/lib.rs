//! # Shared Leaderboard Protocol
//!
//! Types exchanged between the event generator and the statistics service,
//! together with the line-oriented text encodings used on the wire.
//!
//! ## Inbound events
//! Every datagram line carries one [`Event`]:
//!
//! ```text
//! <type> <user> [<field>...]
//! ```
//!
//! where `type` is the numeric [`EventType`] code. Lines that fail to decode
//! produce a [`DecodeError`] and are dropped by the receiver.
//!
//! ## Outbound packets
//! A [`Packet`] is a rank snapshot for one user: their 1-based position, the
//! global top of the leaderboard and the entries surrounding them. It renders
//! to a human-readable block of text via its `Display` implementation.

pub mod event;
pub mod packet;

pub use event::{DecodeError, Event, EventType, User};
pub use packet::{Packet, Standing};

/// Number of leaders in `top` and entries on each side in `near`
pub const NEIGHBORS_COUNT: usize = 10;

pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
/// Length of one competition window
pub const NANOS_PER_WEEK: i64 = 7 * 24 * 60 * NANOS_PER_MINUTE;

/// Receive buffer size used when none is configured
pub const DATAGRAM_BUFFER_SIZE: usize = 1024;
