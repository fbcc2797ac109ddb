//! Performance benchmarks for the ranking hot paths

use generator::event_generator::{EventGenerator, GeneratorSettings};
use shared::{Event, NEIGHBORS_COUNT};
use statistics_service::events_handler::EventsHandler;
use statistics_service::packet_queue::PacketQueue;
use statistics_service::ranking::RankingStore;
use std::sync::Arc;
use std::time::Instant;

/// Benchmarks amount updates, each of which moves a key in the rank index
#[test]
fn benchmark_upsert_delta() {
    let mut store = RankingStore::new();
    for user in 0..10_000 {
        store.ensure_user(user);
    }

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let user = (i * 7919) % 10_000;
        let delta = i64::from((i % 2001) - 1000);
        store.upsert_delta(user, delta);
    }

    let duration = start.elapsed();
    println!(
        "Upsert delta: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(store.len(), 10_000);
    assert!(duration.as_secs() < 10);
}

/// Benchmarks building a full rank packet for users spread across the board
#[test]
fn benchmark_packet_queries() {
    let mut store = RankingStore::new();
    for user in 0..50_000 {
        store.upsert_delta(user, i64::from(user % 977));
    }

    let iterations = 20_000;
    let start = Instant::now();

    let mut total_near = 0;
    for i in 0..iterations {
        let user = (i * 104_729) % 50_000;
        let _position = store.rank_of(user);
        let _top = store.top(NEIGHBORS_COUNT);
        total_near += store.neighbors(user, NEIGHBORS_COUNT).len();
    }

    let duration = start.elapsed();
    println!(
        "Packet queries: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(total_near > 0);
    assert!(duration.as_secs() < 10);
}

/// Benchmarks the weekly reset over a large user base
#[test]
fn benchmark_reset_all() {
    let mut store = RankingStore::new();
    for user in 0..100_000 {
        store.upsert_delta(user, i64::from(user));
    }

    let start = Instant::now();
    store.reset_all();
    let duration = start.elapsed();

    println!("Reset of {} users in {:?}", store.len(), duration);

    assert_eq!(store.rank_of(0), Some(1));
    assert_eq!(store.rank_of(99_999), Some(100_000));
    assert!(duration.as_secs() < 10);
}

/// Benchmarks end-to-end event application with a realistic event mix
#[test]
fn benchmark_event_processing() {
    let events: Vec<Event> = EventGenerator::from_seed(5, GeneratorSettings::default())
        .take(200_000)
        .collect();

    let queue = Arc::new(PacketQueue::new());
    let mut handler = EventsHandler::new(Arc::clone(&queue));

    let start = Instant::now();
    for event in events {
        handler.apply(event);
    }
    let duration = start.elapsed();

    println!(
        "Event processing: 200000 events in {:?} ({:.2} μs/event), {} users connected",
        duration,
        duration.as_micros() as f64 / 200_000.0,
        handler.connected_count()
    );

    assert!(handler.ranking().len() <= 1000);
    assert!(duration.as_secs() < 30);
}
