//! Applies user events to the leaderboard and decides when to publish ranks
//!
//! The handler is the only owner of user and ranking state, so none of it is
//! locked. Events are applied strictly in arrival order because week and
//! minute boundaries are detected by comparing each deal's window time with
//! the previous one.

use crate::packet_queue::PacketQueue;
use crate::ranking::RankingStore;
use crate::shutdown::Shutdown;
use log::{debug, info, trace, warn};
use shared::{Event, Packet, User, NANOS_PER_MINUTE, NANOS_PER_WEEK, NEIGHBORS_COUNT};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Projects a sender timestamp into the current 7-day window
pub fn window_time(time: i64) -> i64 {
    time.rem_euclid(NANOS_PER_WEEK)
}

#[derive(Debug)]
pub struct EventsHandler {
    registered_users: HashMap<User, String>,
    /// Ordered so broadcast batches are reproducible
    connected_users: BTreeSet<User>,
    ranking: RankingStore,
    /// Window time of the last processed deal
    last_update_week_time: i64,
    packets: Arc<PacketQueue>,
}

impl EventsHandler {
    pub fn new(packets: Arc<PacketQueue>) -> Self {
        Self {
            registered_users: HashMap::new(),
            connected_users: BTreeSet::new(),
            ranking: RankingStore::new(),
            last_update_week_time: 0,
            packets,
        }
    }

    pub fn ranking(&self) -> &RankingStore {
        &self.ranking
    }

    pub fn name_of(&self, user: User) -> Option<&str> {
        self.registered_users.get(&user).map(String::as_str)
    }

    pub fn is_connected(&self, user: User) -> bool {
        self.connected_users.contains(&user)
    }

    pub fn connected_count(&self) -> usize {
        self.connected_users.len()
    }

    pub fn last_update_week_time(&self) -> i64 {
        self.last_update_week_time
    }

    /// Consumes events until the channel closes or `shutdown` fires with
    /// nothing left to take. Hands the handler back for final reporting.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<Event>,
        shutdown: Shutdown,
    ) -> Self {
        info!("Events handler started");

        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => self.apply(event),
                    None => {
                        info!("Event channel closed");
                        break;
                    }
                },

                _ = shutdown.wait() => break,
            }
        }

        info!("Events handler stopped");
        self
    }

    pub fn apply(&mut self, event: Event) {
        trace!("Applying event: {}", event);

        match event {
            Event::UserRegistered { user, name } => self.registered(user, name),
            Event::UserRenamed { user, name } => self.renamed(user, name),
            Event::UserDealWon { user, time, amount } => self.deal_won(user, time, amount),
            Event::UserConnected { user } => self.connected(user),
            Event::UserDisconnected { user } => {
                self.connected_users.remove(&user);
            }
        }
    }

    fn registered(&mut self, user: User, name: String) {
        self.registered_users.insert(user, name);
        self.ranking.ensure_user(user);
    }

    fn renamed(&mut self, user: User, name: String) {
        if self.registered_users.insert(user, name).is_none() {
            warn!("Renamed user {} was never registered", user);
        }
    }

    fn connected(&mut self, user: User) {
        if self.ranking.ensure_user(user) {
            warn!("Connected user {} has no statistics, starting at 0", user);
        }
        self.connected_users.insert(user);

        if let Some(packet) = self.packet_for(user) {
            self.packets.put(packet);
        }
    }

    fn deal_won(&mut self, user: User, time: i64, amount: i64) {
        if !self.ranking.contains(user) {
            warn!("Deal won by unknown user {}, starting at 0", user);
        }

        let week_time = window_time(time);

        // A window time behind the previous one is taken as the start of a new
        // week, including late deals from the previous week.
        if week_time < self.last_update_week_time {
            info!("New week started, resetting {} users", self.ranking.len());
            self.ranking.reset_all();
        }

        self.ranking.upsert_delta(user, amount);

        if week_time / NANOS_PER_MINUTE != self.last_update_week_time / NANOS_PER_MINUTE {
            self.broadcast();
        }

        self.last_update_week_time = week_time;
    }

    /// Rank snapshot for `user`, or `None` if the user has no statistics
    pub fn packet_for(&self, user: User) -> Option<Packet> {
        let position = self.ranking.rank_of(user)?;
        Some(Packet {
            user,
            position,
            top: self.ranking.top(NEIGHBORS_COUNT),
            near: self.ranking.neighbors(user, NEIGHBORS_COUNT),
        })
    }

    fn broadcast(&self) {
        let packets: Vec<Packet> = self
            .connected_users
            .iter()
            .filter_map(|&user| self.packet_for(user))
            .collect();

        debug!("Broadcasting {} packets", packets.len());
        self.packets.replace(packets);
    }
}
