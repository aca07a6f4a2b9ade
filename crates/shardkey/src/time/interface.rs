use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Bespoke epoch: Tuesday, October 24, 2017 00:00:00 UTC, as a [`Duration`]
/// since the Unix epoch.
///
/// All embedded timestamps are measured from this instant. Anchoring the
/// 32-bit hour field to a recent origin instead of 1970 extends its usable
/// range to several hundred thousand years.
pub const EPOCH: Duration = Duration::from_secs(1_508_803_200);

/// Nanoseconds per second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Nanoseconds per minute.
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;

/// Nanoseconds per hour.
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// A trait for time sources that report nanoseconds elapsed since [`EPOCH`].
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests. The value is signed so that instants before the
/// epoch remain representable.
///
/// # Example
///
/// ```
/// use shardkey::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_nanos(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_nanos(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in nanoseconds since [`EPOCH`].
    fn current_nanos(&self) -> i64;
}

/// Converts a [`SystemTime`] into nanoseconds since [`EPOCH`].
///
/// Instants before the epoch yield a negative value.
pub fn to_epoch_nanos(at: SystemTime) -> i64 {
    let origin = UNIX_EPOCH + EPOCH;
    match at.duration_since(origin) {
        Ok(elapsed) => elapsed.as_nanos() as i64,
        Err(behind) => -(behind.duration().as_nanos() as i64),
    }
}

/// Converts nanoseconds since [`EPOCH`] back into a [`SystemTime`].
pub fn from_epoch_nanos(nanos: i64) -> SystemTime {
    let origin = UNIX_EPOCH + EPOCH;
    if nanos >= 0 {
        origin + Duration::from_nanos(nanos as u64)
    } else {
        origin - Duration::from_nanos(nanos.unsigned_abs())
    }
}
