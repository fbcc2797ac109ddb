//! # Statistics Service Library
//!
//! This library implements the live leaderboard service. It consumes user
//! lifecycle events arriving as UDP datagrams, keeps a running total of won
//! deal amounts per user, and pushes rank snapshots to a single destination
//! over UDP.
//!
//! ## Core Responsibilities
//!
//! ### Event Processing
//! Registrations, renames, connections, disconnections and won deals are
//! applied one at a time, in arrival order, by a single owner of all
//! leaderboard state. Malformed datagrams are dropped at the receiver and
//! never reach the processing stage.
//!
//! ### Ranking
//! Users are ordered by total amount, highest first, with the lower user id
//! winning ties. Rank, top-N and neighbour queries run against an
//! order-statistics tree rather than scanning every user.
//!
//! ### Weekly Windows
//! Deal timestamps are projected into a 7-day window. When a deal's window
//! time falls behind the previous deal's, a new week is assumed and every
//! total is reset to zero.
//!
//! ### Rank Broadcasting
//! A user receives a snapshot when they connect. Every time deal processing
//! crosses a minute boundary, every connected user receives a fresh one.
//!
//! ## Architecture Design
//!
//! ### Pipeline Stages
//! Three tokio tasks cooperate, one per stage:
//! - **Event Receiver**: decodes datagrams into events
//! - **Events Handler**: applies events and produces packets
//! - **Packets Handler**: renders packets and sends them
//!
//! Events flow through an unbounded channel; packets flow through a
//! [`packet_queue::PacketQueue`], which lets a broadcast replace packets that
//! have not been sent yet.
//!
//! ### Shutdown
//! A shared [`shutdown::Shutdown`] signal stops every stage cooperatively.
//! Each stage finishes the item it is working on and exits once nothing is
//! left to take.
//!
//! ## Module Organization
//!
//! - `config`: command line options
//! - `ranked_set`: order-statistics tree over `(amount, user)` keys
//! - `ranking`: per-user totals kept in lock-step with the ranked set
//! - `events_handler`: event state machine and week/minute policy
//! - `packet_queue`: outbound queue with append and batch replace
//! - `packets_handler`: outbound packet transmission
//! - `network`: event receiver and the [`network::Server`] wiring it all
//! - `shutdown`: cooperative stop signal
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use statistics_service::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:9000", "127.0.0.1:9001".parse()?, 1024).await?;
//!
//!     let shutdown = server.shutdown_handle();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         shutdown.trigger();
//!     });
//!
//!     let report = server.run().await?;
//!     println!("{} users ranked", report.standings.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod events_handler;
pub mod network;
pub mod packet_queue;
pub mod packets_handler;
pub mod ranked_set;
pub mod ranking;
pub mod shutdown;
