use crate::base62::{Base62Ext, BeBytes};
use crate::error::{Error, Result};
use crate::id::Id;
use crate::time::{EPOCH, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The shard half of a [`ShardedId`]: which storage partition owns the
/// record, plus the identifier's timestamp truncated to the hour.
///
/// ```text
///  Bit Index:  63        48 47          32 31        0
///              +------------+--------------+----------+
///  Field:      | index (16) | reserved (16)| hours (32)|
///              +------------+--------------+----------+
///              |<----- MSB ---- 64 bits ---- LSB ----->|
/// ```
///
/// Because every field is stored most-significant-time-unit first, byte-wise
/// comparison of two shards equals their chronological ordering (within the
/// same shard index).
///
/// [`ShardedId`]: crate::ShardedId
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Shard {
    id: u64,
}

const _: () = {
    assert!(
        Shard::INDEX_BITS + Shard::RESERVED_BITS + Shard::HOURS_BITS == u64::BITS,
        "Layout must match underlying type width"
    );
};

impl Shard {
    pub const INDEX_BITS: u32 = 16;
    pub const RESERVED_BITS: u32 = 16;
    pub const HOURS_BITS: u32 = 32;

    pub const HOURS_SHIFT: u32 = 0;
    pub const RESERVED_SHIFT: u32 = Self::HOURS_SHIFT + Self::HOURS_BITS;
    pub const INDEX_SHIFT: u32 = Self::RESERVED_SHIFT + Self::RESERVED_BITS;

    pub const INDEX_MASK: u64 = (1 << Self::INDEX_BITS) - 1;
    pub const RESERVED_MASK: u64 = (1 << Self::RESERVED_BITS) - 1;
    pub const HOURS_MASK: u64 = (1 << Self::HOURS_BITS) - 1;

    /// Packs a shard index and an hour count into a shard half. The reserved
    /// bits are always zero.
    #[must_use]
    pub const fn from_components(index: u16, hours: u32) -> Self {
        Self {
            id: ((index as u64) << Self::INDEX_SHIFT) | ((hours as u64) << Self::HOURS_SHIFT),
        }
    }

    /// Extracts the shard index.
    #[must_use]
    pub const fn index(&self) -> u16 {
        ((self.id >> Self::INDEX_SHIFT) & Self::INDEX_MASK) as u16
    }

    /// Extracts the hours elapsed since [`EPOCH`].
    ///
    /// [`EPOCH`]: crate::EPOCH
    #[must_use]
    pub const fn hours(&self) -> u32 {
        ((self.id >> Self::HOURS_SHIFT) & Self::HOURS_MASK) as u32
    }

    /// Returns the embedded timestamp, truncated to the top of the hour.
    ///
    /// The sub-hour portion lives in the [`Key`] half.
    #[must_use]
    pub fn datetime(&self) -> SystemTime {
        UNIX_EPOCH + EPOCH + Duration::from_secs(u64::from(self.hours()) * 3600)
    }

    /// Returns `true` if every bit is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.id == 0
    }

    /// Returns `true` if the reserved bits are unset.
    ///
    /// Decoding never enforces this; values produced by a generator always
    /// satisfy it.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        (self.id >> Self::RESERVED_SHIFT) & Self::RESERVED_MASK == 0
    }

    /// Returns a canonical copy with the reserved bits cleared.
    #[must_use]
    pub const fn into_valid(self) -> Self {
        Self {
            id: self.id & !(Self::RESERVED_MASK << Self::RESERVED_SHIFT),
        }
    }

    /// Converts this type into its raw type representation
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw type into this type
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }
}

impl Id for Shard {
    type Ty = u64;

    fn to_raw(&self) -> Self::Ty {
        self.to_raw()
    }

    fn from_raw(raw: Self::Ty) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = <u64 as BeBytes>::Base62Array::default();
        self.encode_to_buf(&mut buf);
        // SAFETY: base-62 output is always valid ASCII
        f.write_str(unsafe { core::str::from_utf8_unchecked(buf.as_ref()) })
    }
}

impl fmt::Debug for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Shard");
        dbg.field("id", &format_args!("{} (0x{:x})", self.id, self.id));
        dbg.field("index", &self.index());
        dbg.field("hours", &self.hours());
        dbg.finish()
    }
}

impl core::str::FromStr for Shard {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl TryFrom<&str> for Shard {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

/// The key half of a [`ShardedId`]: unique within a shard, it carries the
/// sub-hour time, the cyclic counter and the generating process's id.
///
/// ```text
///  Bit Index:  63     58 57     52 51      22 21       16 15         0
///              +---------+---------+-----------+-----------+----------+
///  Field:      | min (6) | sec (6) | nanos (30)| count (6) | proc (16)|
///              +---------+---------+-----------+-----------+----------+
///              |<-------- MSB -------- 64 bits -------- LSB --------->|
/// ```
///
/// A key alone is enough to reconstruct the process id, the counter and the
/// minute/second/nanosecond offset within its hour, but not the hour itself
/// or the shard index; those live in the [`Shard`] half.
///
/// [`ShardedId`]: crate::ShardedId
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Key {
    id: u64,
}

const _: () = {
    assert!(
        Key::MINUTE_BITS + Key::SECOND_BITS + Key::NANOS_BITS + Key::COUNTER_BITS
            + Key::PROCESS_BITS
            == u64::BITS,
        "Layout must match underlying type width"
    );
};

impl Key {
    pub const MINUTE_BITS: u32 = 6;
    pub const SECOND_BITS: u32 = 6;
    pub const NANOS_BITS: u32 = 30;
    pub const COUNTER_BITS: u32 = 6;
    pub const PROCESS_BITS: u32 = 16;

    pub const PROCESS_SHIFT: u32 = 0;
    pub const COUNTER_SHIFT: u32 = Self::PROCESS_SHIFT + Self::PROCESS_BITS;
    pub const NANOS_SHIFT: u32 = Self::COUNTER_SHIFT + Self::COUNTER_BITS;
    pub const SECOND_SHIFT: u32 = Self::NANOS_SHIFT + Self::NANOS_BITS;
    pub const MINUTE_SHIFT: u32 = Self::SECOND_SHIFT + Self::SECOND_BITS;

    pub const MINUTE_MASK: u64 = (1 << Self::MINUTE_BITS) - 1;
    pub const SECOND_MASK: u64 = (1 << Self::SECOND_BITS) - 1;
    pub const NANOS_MASK: u64 = (1 << Self::NANOS_BITS) - 1;
    pub const COUNTER_MASK: u64 = (1 << Self::COUNTER_BITS) - 1;
    pub const PROCESS_MASK: u64 = (1 << Self::PROCESS_BITS) - 1;

    /// Packs the sub-hour fields into a key half.
    ///
    /// Each field is masked into its bit width; passing an out-of-range
    /// minute, second, nanosecond or counter is a caller bug.
    #[must_use]
    pub const fn from_components(
        minute: u8,
        second: u8,
        nanos: u32,
        counter: u8,
        process: u16,
    ) -> Self {
        debug_assert!(minute < 60, "minute out of range");
        debug_assert!(second < 60, "second out of range");
        debug_assert!(nanos < 1_000_000_000, "nanos out of range");
        debug_assert!((counter as u64) <= Key::COUNTER_MASK, "counter out of range");
        let id = (((minute as u64) & Self::MINUTE_MASK) << Self::MINUTE_SHIFT)
            | (((second as u64) & Self::SECOND_MASK) << Self::SECOND_SHIFT)
            | (((nanos as u64) & Self::NANOS_MASK) << Self::NANOS_SHIFT)
            | (((counter as u64) & Self::COUNTER_MASK) << Self::COUNTER_SHIFT)
            | ((process as u64) << Self::PROCESS_SHIFT);
        Self { id }
    }

    /// Extracts the minute within the hour.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        ((self.id >> Self::MINUTE_SHIFT) & Self::MINUTE_MASK) as u8
    }

    /// Extracts the second within the minute.
    #[must_use]
    pub const fn second(&self) -> u8 {
        ((self.id >> Self::SECOND_SHIFT) & Self::SECOND_MASK) as u8
    }

    /// Extracts the nanosecond within the second.
    #[must_use]
    pub const fn nanos(&self) -> u32 {
        ((self.id >> Self::NANOS_SHIFT) & Self::NANOS_MASK) as u32
    }

    /// Extracts the cyclic counter.
    #[must_use]
    pub const fn counter(&self) -> u8 {
        ((self.id >> Self::COUNTER_SHIFT) & Self::COUNTER_MASK) as u8
    }

    /// Extracts the generating process's id.
    #[must_use]
    pub const fn process(&self) -> u16 {
        ((self.id >> Self::PROCESS_SHIFT) & Self::PROCESS_MASK) as u16
    }

    /// Returns the embedded time as an offset from the top of its hour.
    #[must_use]
    pub fn elapsed_in_hour(&self) -> Duration {
        let nanos = u64::from(self.minute()) * NANOS_PER_MINUTE as u64
            + u64::from(self.second()) * NANOS_PER_SECOND as u64
            + u64::from(self.nanos());
        Duration::from_nanos(nanos)
    }

    /// Returns `true` if every bit is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.id == 0
    }

    /// Converts this type into its raw type representation
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw type into this type
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }
}

impl Id for Key {
    type Ty = u64;

    fn to_raw(&self) -> Self::Ty {
        self.to_raw()
    }

    fn from_raw(raw: Self::Ty) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = <u64 as BeBytes>::Base62Array::default();
        self.encode_to_buf(&mut buf);
        // SAFETY: base-62 output is always valid ASCII
        f.write_str(unsafe { core::str::from_utf8_unchecked(buf.as_ref()) })
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Key");
        dbg.field("id", &format_args!("{} (0x{:x})", self.id, self.id));
        dbg.field("minute", &self.minute());
        dbg.field("second", &self.second());
        dbg.field("nanos", &self.nanos());
        dbg.field("counter", &self.counter());
        dbg.field("process", &self.process());
        dbg.finish()
    }
}

impl core::str::FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl TryFrom<&str> for Key {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}
