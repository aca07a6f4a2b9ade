use crate::error::Result;
use crate::generator::mutex::Mutex;
use crate::id::{Key, ShardedId};
use crate::time::{TimeSource, to_epoch_nanos};
use std::sync::Arc;
use std::time::SystemTime;

#[cfg(feature = "tracing")]
use tracing::instrument;

const MAX_COUNTER: u8 = Key::COUNTER_MASK as u8;

/// The claimed-time state guarded by the generator lock.
#[derive(Debug)]
struct ClockState {
    /// Last nanosecond-since-epoch instant claimed for generation. Never
    /// moves backward.
    internal: i64,
    /// Cyclic tie-breaker within `internal`. A value above [`MAX_COUNTER`]
    /// marks the instant as exhausted.
    counter: u8,
}

/// A per-process identifier generator suitable for multi-threaded
/// environments.
///
/// One `ProcessClock` owns the monotonic clock/counter state for one logical
/// generation context. The state is wrapped in an [`Arc<Mutex<_>>`],
/// allowing safe shared use across threads; every generation call runs the
/// claim sequence under that single lock, so no two identifiers from the
/// same instance are ever equal and the embedded time never decreases, even
/// when the wall clock does.
///
/// Uniqueness *across* generators rests on the caller: every concurrently
/// active `ProcessClock` must be constructed with a distinct process id.
///
/// Within one claimed nanosecond, up to 64 identifiers can be issued; a
/// burst beyond that briefly spins inside the lock until the time source
/// advances past the claimed instant. The wait resolves in well under a
/// microsecond and is not reported to the caller.
///
/// # Example
///
/// ```
/// use shardkey::{ProcessClock, SystemClock};
/// use std::time::SystemTime;
///
/// let clock = ProcessClock::new(7, SystemClock);
/// let id = clock.try_next_id(42, SystemTime::now()).unwrap();
/// assert_eq!(id.shard_index(), 42);
/// assert_eq!(id.process(), 7);
/// ```
pub struct ProcessClock<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ClockState>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ClockState>>,
    id: u16,
    time: T,
}

impl<T> ProcessClock<T>
where
    T: TimeSource,
{
    /// Creates a new `ProcessClock` for the given process id.
    ///
    /// The internal time is seeded one nanosecond past the time source's
    /// current reading, so a restarted process cannot collide with an
    /// identifier its previous incarnation issued within the same
    /// nanosecond.
    ///
    /// # Parameters
    ///
    /// - `id`: the process id encoded into every generated identifier. Must
    ///   be unique among concurrently active generators.
    /// - `time`: a [`TimeSource`] (e.g. [`SystemClock`]) consulted when a
    ///   claimed nanosecond is exhausted.
    ///
    /// [`SystemClock`]: crate::SystemClock
    pub fn new(id: u16, time: T) -> Self {
        let internal = time.current_nanos() + 1;
        Self::from_components(id, internal, 0, time)
    }

    /// Creates a `ProcessClock` from explicit state.
    ///
    /// This constructor is primarily useful for restoring a generator from
    /// persisted state or pinning its starting instant under test. In
    /// typical use, prefer [`Self::new`].
    pub fn from_components(id: u16, internal: i64, counter: u8, time: T) -> Self {
        let state = ClockState { internal, counter };
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
            id,
            time,
        }
    }

    /// Returns the process id this generator stamps into identifiers.
    #[must_use]
    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Generates a new identifier for `shard_index` at the caller-observed
    /// timestamp `at`.
    ///
    /// This is the infallible counterpart to [`Self::try_next_id`],
    /// available when the lock cannot be poisoned.
    #[cfg(feature = "parking-lot")]
    #[must_use]
    pub fn next_id(&self, shard_index: u16, at: SystemTime) -> ShardedId {
        match self.try_next_id(shard_index, at) {
            Ok(id) => id,
            // parking_lot locks do not poison
            Err(_) => unreachable!(),
        }
    }

    /// Generates a new identifier for `shard_index` at the caller-observed
    /// timestamp `at`, with fallible error handling.
    ///
    /// The supplied timestamp is adopted only if it is later than the last
    /// claimed instant; otherwise the claimed instant is reused and the
    /// counter consumed, so identifiers remain non-decreasing in embedded
    /// time even when `at` jumps backward. When the counter for the claimed
    /// nanosecond is exhausted, the call spins until the generator's time
    /// source moves past it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying lock has been poisoned
    /// (std mutex builds).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self, shard_index: u16, at: SystemTime) -> Result<ShardedId> {
        let mut ts = to_epoch_nanos(at);

        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        loop {
            if ts > state.internal {
                state.internal = ts;
                state.counter = 0;
                break;
            }
            if state.counter <= MAX_COUNTER {
                break;
            }
            // Same or earlier instant and the counter is spent: re-read the
            // clock until it moves past the claimed nanosecond.
            ts = self.time.current_nanos();
            core::hint::spin_loop();
        }

        let claimed = state.internal;
        let counter = state.counter;
        state.counter += 1;
        drop(state);

        Ok(ShardedId::from_timestamp(shard_index, claimed, counter, self.id))
    }
}
