//! Random event sequences that respect each user's lifecycle

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Event, EventType, User, NANOS_PER_SECOND};
use std::collections::{HashMap, HashSet};

/// Value ranges used when drawing events
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub min_user: User,
    pub max_user: User,
    pub min_amount: i64,
    pub max_amount: i64,
    /// Largest step the deal clock advances between two deals
    pub max_time_step: i64,
    pub min_name_len: usize,
    pub max_name_len: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            min_user: 1,
            max_user: 1000,
            min_amount: -1000,
            max_amount: 1000,
            max_time_step: NANOS_PER_SECOND,
            min_name_len: 6,
            max_name_len: 12,
        }
    }
}

/// Produces events that are always legal for the user they concern.
///
/// A user must register first, a registered user that is offline can only
/// connect, and a connected user can rename, win a deal or disconnect.
pub struct EventGenerator<R: Rng = StdRng> {
    rng: R,
    settings: GeneratorSettings,
    registered_users: HashMap<User, String>,
    connected_users: HashSet<User>,
    current_time: i64,
}

impl EventGenerator<StdRng> {
    pub fn from_seed(seed: u64, settings: GeneratorSettings) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), settings)
    }

    pub fn from_entropy(settings: GeneratorSettings) -> Self {
        Self::with_rng(StdRng::from_entropy(), settings)
    }
}

impl<R: Rng> EventGenerator<R> {
    pub fn with_rng(rng: R, settings: GeneratorSettings) -> Self {
        Self {
            rng,
            settings,
            registered_users: HashMap::new(),
            connected_users: HashSet::new(),
            current_time: 0,
        }
    }

    /// Timestamp of the most recent deal
    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    pub fn is_allowed(&self, user: User, event_type: EventType) -> bool {
        if !self.registered_users.contains_key(&user) {
            return event_type == EventType::UserRegistered;
        }
        if !self.connected_users.contains(&user) {
            return event_type == EventType::UserConnected;
        }
        matches!(
            event_type,
            EventType::UserRenamed | EventType::UserDealWon | EventType::UserDisconnected
        )
    }

    pub fn next_event(&mut self) -> Event {
        let user = self
            .rng
            .gen_range(self.settings.min_user..=self.settings.max_user);

        let allowed: Vec<EventType> = EventType::ALL
            .into_iter()
            .filter(|&event_type| self.is_allowed(user, event_type))
            .collect();
        let event_type = allowed[self.rng.gen_range(0..allowed.len())];

        match event_type {
            EventType::UserRegistered => {
                let name = self.random_name();
                self.registered_users.insert(user, name.clone());
                Event::UserRegistered { user, name }
            }
            EventType::UserRenamed => {
                let name = self.random_name();
                self.registered_users.insert(user, name.clone());
                Event::UserRenamed { user, name }
            }
            EventType::UserDealWon => {
                self.current_time += self.rng.gen_range(0..=self.settings.max_time_step);
                let amount = self
                    .rng
                    .gen_range(self.settings.min_amount..=self.settings.max_amount);
                Event::UserDealWon {
                    user,
                    time: self.current_time,
                    amount,
                }
            }
            EventType::UserConnected => {
                self.connected_users.insert(user);
                Event::UserConnected { user }
            }
            EventType::UserDisconnected => {
                self.connected_users.remove(&user);
                Event::UserDisconnected { user }
            }
        }
    }

    fn random_name(&mut self) -> String {
        let len = self
            .rng
            .gen_range(self.settings.min_name_len..=self.settings.max_name_len);
        (0..len)
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect()
    }
}

impl<R: Rng> Iterator for EventGenerator<R> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_event())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_settings() -> GeneratorSettings {
        GeneratorSettings {
            min_user: 1,
            max_user: 5,
            ..GeneratorSettings::default()
        }
    }

    #[test]
    fn test_first_event_is_registration() {
        let mut generator = EventGenerator::from_seed(7, small_settings());
        match generator.next_event() {
            Event::UserRegistered { user, name } => {
                assert!((1..=5).contains(&user));
                assert!((6..=12).contains(&name.len()));
                assert!(name.chars().all(|c| c.is_ascii_lowercase()));
            }
            other => panic!("Unexpected first event: {:?}", other),
        }
    }

    #[test]
    fn test_sequence_respects_lifecycle() {
        let mut generator = EventGenerator::from_seed(42, small_settings());
        let mut registered = HashSet::new();
        let mut connected = HashSet::new();

        for event in generator.by_ref().take(5_000) {
            let user = event.user();
            match event {
                Event::UserRegistered { .. } => {
                    assert!(registered.insert(user), "user {} registered twice", user);
                }
                Event::UserConnected { .. } => {
                    assert!(registered.contains(&user));
                    assert!(connected.insert(user), "user {} connected twice", user);
                }
                Event::UserRenamed { .. } | Event::UserDealWon { .. } => {
                    assert!(connected.contains(&user));
                }
                Event::UserDisconnected { .. } => {
                    assert!(connected.remove(&user));
                }
            }
        }
    }

    #[test]
    fn test_deal_times_never_decrease() {
        let mut generator = EventGenerator::from_seed(3, small_settings());
        let mut last_time = 0;
        let mut deals = 0;

        for event in generator.by_ref().take(5_000) {
            if let Event::UserDealWon { time, amount, .. } = event {
                assert!(time >= last_time);
                assert!(time - last_time <= NANOS_PER_SECOND);
                assert!((-1000..=1000).contains(&amount));
                last_time = time;
                deals += 1;
            }
        }

        assert!(deals > 0);
        assert_eq!(generator.current_time(), last_time);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let first: Vec<Event> = EventGenerator::from_seed(11, GeneratorSettings::default())
            .take(200)
            .collect();
        let second: Vec<Event> = EventGenerator::from_seed(11, GeneratorSettings::default())
            .take(200)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_allowed() {
        let mut generator = EventGenerator::from_seed(
            1,
            GeneratorSettings {
                min_user: 9,
                max_user: 9,
                ..GeneratorSettings::default()
            },
        );
        assert!(generator.is_allowed(9, EventType::UserRegistered));
        assert!(!generator.is_allowed(9, EventType::UserDealWon));

        generator.next_event();
        assert!(generator.is_allowed(9, EventType::UserConnected));
        assert!(!generator.is_allowed(9, EventType::UserRenamed));

        generator.next_event();
        assert!(generator.is_allowed(9, EventType::UserDealWon));
        assert!(generator.is_allowed(9, EventType::UserDisconnected));
        assert!(!generator.is_allowed(9, EventType::UserConnected));
    }
}
