use crate::generator::ProcessClock;
use crate::id::ShardedId;
use crate::time::{
    NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND, SystemClock, TimeSource, from_epoch_nanos,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread::scope;
use std::time::SystemTime;

// An hour-aligned instant a few decades past the epoch.
const T0: i64 = 450_000 * NANOS_PER_HOUR;

struct FixedTime {
    nanos: i64,
}

impl TimeSource for FixedTime {
    fn current_nanos(&self) -> i64 {
        self.nanos
    }
}

/// Advances by one nanosecond on every read, like a wall clock observed at
/// its own resolution.
struct TickingTime {
    now: AtomicI64,
}

impl TickingTime {
    fn starting_at(nanos: i64) -> Self {
        Self {
            now: AtomicI64::new(nanos),
        }
    }
}

impl TimeSource for TickingTime {
    fn current_nanos(&self) -> i64 {
        self.now.fetch_add(1, Ordering::Relaxed)
    }
}

fn pinned_clock(process: u16) -> ProcessClock<FixedTime> {
    ProcessClock::from_components(process, T0, 0, FixedTime { nanos: T0 })
}

#[test]
fn seeds_one_nanosecond_ahead() {
    let clock = ProcessClock::new(9, FixedTime { nanos: 41 });
    let id = clock.try_next_id(0, from_epoch_nanos(0)).unwrap();
    assert_eq!(id.timestamp_nanos(), 42);
    assert_eq!(id.counter(), 0);
}

#[test]
fn counter_increments_within_same_nanosecond() {
    let clock = pinned_clock(12);
    let at = from_epoch_nanos(T0);
    for expected in 0..=5_u8 {
        let id = clock.try_next_id(42, at).unwrap();
        assert_eq!(id.counter(), expected);
        assert_eq!(id.timestamp_nanos(), T0);
    }
}

#[test]
fn clock_regression_keeps_time_and_counter() {
    let clock = pinned_clock(12);
    let at = from_epoch_nanos(T0);

    let mut id = ShardedId::from_raw(0);
    for _ in 0..5 {
        id = clock.try_next_id(2, at).unwrap();
    }
    assert_eq!(id.counter(), 4);

    // A timestamp a millisecond in the past must not rewind the claimed
    // time, and must keep consuming the counter.
    let behind = from_epoch_nanos(T0 - NANOS_PER_SECOND / 1_000);
    let id = clock.try_next_id(2, behind).unwrap();
    assert_eq!(id.timestamp_nanos(), T0);
    assert_eq!(id.counter(), 5);

    // Back at the claimed instant: still the counter path.
    let id = clock.try_next_id(2, at).unwrap();
    assert_eq!(id.timestamp_nanos(), T0);
    assert_eq!(id.counter(), 6);

    // Strictly later: adopted, counter reset.
    let ahead = from_epoch_nanos(T0 + NANOS_PER_SECOND / 1_000);
    let id = clock.try_next_id(2, ahead).unwrap();
    assert_eq!(id.timestamp_nanos(), T0 + NANOS_PER_SECOND / 1_000);
    assert_eq!(id.counter(), 0);
}

#[test]
fn counter_overflow_waits_for_the_clock() {
    let clock = ProcessClock::from_components(1, T0, 0, TickingTime::starting_at(T0));
    let at = from_epoch_nanos(T0);

    for expected in 0..=63_u8 {
        let id = clock.try_next_id(2, at).unwrap();
        assert_eq!(id.counter(), expected);
        assert_eq!(id.timestamp_nanos(), T0);
    }

    // The 65th identifier for the same instant must observe a later clock
    // reading and a reset counter.
    let id = clock.try_next_id(2, at).unwrap();
    assert_eq!(id.counter(), 0);
    assert!(id.timestamp_nanos() > T0);
}

#[test]
fn embedded_time_roundtrips_exactly() {
    let clock = pinned_clock(1);
    let at = from_epoch_nanos(T0 + 123_456_789);
    let id = clock.try_next_id(2, at).unwrap();
    assert_eq!(id.datetime(), at);
}

#[test]
fn shard_reports_index_and_generation_hour() {
    let clock = pinned_clock(1);
    let at = from_epoch_nanos(T0 + 42 * NANOS_PER_MINUTE + 3);
    let (shard, _) = clock.try_next_id(42, at).unwrap().split();
    assert_eq!(shard.index(), 42);
    // The shard half truncates the timestamp to the top of the hour.
    assert_eq!(shard.datetime(), from_epoch_nanos(T0));
}

#[test]
fn key_reports_process_and_offset_within_hour() {
    let clock = pinned_clock(12);
    let offset = 42 * NANOS_PER_MINUTE + 7 * NANOS_PER_SECOND + 3;
    let at = from_epoch_nanos(T0 + offset);
    let (_, key) = clock.try_next_id(1, at).unwrap().split();
    assert_eq!(key.process(), 12);
    assert_eq!(key.elapsed_in_hour().as_nanos(), offset as u128);
}

#[test]
fn ids_are_strictly_increasing() {
    let clock = ProcessClock::new(3, SystemClock);
    let mut last = ShardedId::from_raw(0);
    for _ in 0..10_000 {
        let id = clock.try_next_id(1, SystemTime::now()).unwrap();
        assert!(id > last);
        last = id;
    }
}

#[test]
fn concurrent_generation_yields_distinct_ids() {
    const IDS_PER_THREAD: usize = 50_000;

    let clock = Arc::new(ProcessClock::new(12, SystemClock));
    let threads = num_cpus::get().max(2);

    let mut all = Vec::with_capacity(threads * IDS_PER_THREAD);
    scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let clock = Arc::clone(&clock);
                s.spawn(move || {
                    let mut ids = Vec::with_capacity(IDS_PER_THREAD);
                    for _ in 0..IDS_PER_THREAD {
                        ids.push(clock.try_next_id(1, SystemTime::now()).unwrap());
                    }
                    ids
                })
            })
            .collect();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }
    });

    let unique: HashSet<ShardedId> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len(), "duplicate identifiers detected");
}
