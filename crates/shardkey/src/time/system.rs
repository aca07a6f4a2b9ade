use crate::time::{TimeSource, to_epoch_nanos};
use std::time::SystemTime;

/// A time source that queries the system wall clock on every call.
///
/// The wall clock may be adjusted externally (NTP, manual changes) and is
/// therefore not monotonic; the generator compensates by never letting its
/// claimed time move backward, so a clock regression only slows generation
/// down rather than producing out-of-order identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_nanos(&self) -> i64 {
        to_epoch_nanos(SystemTime::now())
    }
}
