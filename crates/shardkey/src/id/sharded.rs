use crate::base62::{Base62Ext, BeBytes};
use crate::error::{Error, Result};
use crate::id::{Id, Key, Shard};
use crate::time::{NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND, from_epoch_nanos};
use core::fmt;
use std::time::SystemTime;

/// A 128-bit shard-aware, time-sortable identifier.
///
/// The value is bipartite: the high 64 bits are the [`Shard`] half, the low
/// 64 bits are the [`Key`] half. When a record is stored inside its shard,
/// the shard half can be trimmed off and the key half alone used as the
/// primary key.
///
/// ```text
///  Bit Index:  127      112 111        96 95       64
///              +------------+--------------+-----------+
///  Shard:      | index (16) | reserved (16)| hours (32)|
///              +------------+--------------+-----------+
///  Bit Index:  63     58 57     52 51      22 21       16 15         0
///              +---------+---------+-----------+-----------+----------+
///  Key:        | min (6) | sec (6) | nanos (30)| count (6) | proc (16)|
///              +---------+---------+-----------+-----------+----------+
/// ```
///
/// Every field is stored big-endian, most-significant-time-unit first, so
/// byte-wise comparison of two identifiers (and of their halves
/// independently) equals the chronological-then-tie-break ordering of the
/// events that produced them. The derived `Ord` compares the backing scalar
/// and is therefore identical to comparing `to_raw().to_be_bytes()`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ShardedId {
    id: u128,
}

const _: () = {
    assert!(
        Shard::INDEX_BITS
            + Shard::RESERVED_BITS
            + Shard::HOURS_BITS
            + Key::MINUTE_BITS
            + Key::SECOND_BITS
            + Key::NANOS_BITS
            + Key::COUNTER_BITS
            + Key::PROCESS_BITS
            == u128::BITS,
        "Layout must match underlying type width"
    );
};

impl ShardedId {
    /// Number of bits occupied by the [`Key`] half.
    pub const KEY_BITS: u32 = u64::BITS;

    /// Packs fully decomposed fields into an identifier.
    ///
    /// Fields are masked into their bit widths; range validation is the
    /// caller's job (the generator is the sole producer in normal use).
    #[must_use]
    pub const fn from_components(
        shard_index: u16,
        hours: u32,
        minute: u8,
        second: u8,
        nanos: u32,
        counter: u8,
        process: u16,
    ) -> Self {
        Self::from_halves(
            Shard::from_components(shard_index, hours),
            Key::from_components(minute, second, nanos, counter, process),
        )
    }

    /// Packs a claimed timestamp, given in nanoseconds since [`EPOCH`], into
    /// an identifier.
    ///
    /// The timestamp is decomposed into hour/minute/second/nanosecond fields
    /// by integer division.
    ///
    /// [`EPOCH`]: crate::EPOCH
    #[must_use]
    pub const fn from_timestamp(shard_index: u16, nanos: i64, counter: u8, process: u16) -> Self {
        let hours = (nanos / NANOS_PER_HOUR) as u32;
        let minute = ((nanos % NANOS_PER_HOUR) / NANOS_PER_MINUTE) as u8;
        let second = ((nanos % NANOS_PER_MINUTE) / NANOS_PER_SECOND) as u8;
        let subsec = (nanos % NANOS_PER_SECOND) as u32;
        Self::from_components(shard_index, hours, minute, second, subsec, counter, process)
    }

    /// Splits the identifier into its [`Shard`] and [`Key`] halves.
    #[must_use]
    pub const fn split(self) -> (Shard, Key) {
        (
            Shard::from_raw((self.id >> Self::KEY_BITS) as u64),
            Key::from_raw(self.id as u64),
        )
    }

    /// Joins a [`Shard`] and a [`Key`] back into an identifier.
    #[must_use]
    pub const fn from_halves(shard: Shard, key: Key) -> Self {
        Self {
            id: ((shard.to_raw() as u128) << Self::KEY_BITS) | (key.to_raw() as u128),
        }
    }

    /// Extracts the shard index.
    #[must_use]
    pub const fn shard_index(&self) -> u16 {
        self.split().0.index()
    }

    /// Extracts the cyclic counter.
    #[must_use]
    pub const fn counter(&self) -> u8 {
        self.split().1.counter()
    }

    /// Extracts the generating process's id.
    #[must_use]
    pub const fn process(&self) -> u16 {
        self.split().1.process()
    }

    /// Returns the embedded timestamp in nanoseconds since [`EPOCH`].
    ///
    /// [`EPOCH`]: crate::EPOCH
    #[must_use]
    pub const fn timestamp_nanos(&self) -> i64 {
        let (shard, key) = self.split();
        shard.hours() as i64 * NANOS_PER_HOUR
            + key.minute() as i64 * NANOS_PER_MINUTE
            + key.second() as i64 * NANOS_PER_SECOND
            + key.nanos() as i64
    }

    /// Returns the embedded timestamp as a [`SystemTime`], exact to the
    /// nanosecond.
    #[must_use]
    pub fn datetime(&self) -> SystemTime {
        from_epoch_nanos(self.timestamp_nanos())
    }

    /// Returns `true` if every bit is zero.
    ///
    /// The all-zero identifier is the designated "no identifier" sentinel
    /// and can be recognized without decoding.
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
        self.split().0.is_valid()
    }

    /// Returns a canonical copy with the reserved bits cleared.
    #[must_use]
    pub const fn into_valid(self) -> Self {
        let (shard, key) = self.split();
        Self::from_halves(shard.into_valid(), key)
    }

    /// Converts this type into its raw type representation
    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Converts a raw type into this type
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }
}

impl Id for ShardedId {
    type Ty = u128;

    fn to_raw(&self) -> Self::Ty {
        self.to_raw()
    }

    fn from_raw(raw: Self::Ty) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for ShardedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = <u128 as BeBytes>::Base62Array::default();
        self.encode_to_buf(&mut buf);
        // SAFETY: base-62 output is always valid ASCII
        f.write_str(unsafe { core::str::from_utf8_unchecked(buf.as_ref()) })
    }
}

impl fmt::Debug for ShardedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (shard, key) = self.split();
        let mut dbg = f.debug_struct("ShardedId");
        dbg.field("id", &format_args!("{} (0x{:x})", self.id, self.id));
        dbg.field("shard", &shard);
        dbg.field("key", &key);
        dbg.finish()
    }
}

impl core::str::FromStr for ShardedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl TryFrom<&str> for ShardedId {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::to_epoch_nanos;

    #[test]
    fn pack_unpack_roundtrip() {
        let id = ShardedId::from_components(42, 77_000, 30, 15, 123_456_789, 3, 7);
        assert_eq!(id.to_raw(), 0x002a_0000_0001_2cc8_78f1_d6f3_4543_0007);

        let (shard, key) = id.split();
        assert_eq!(shard.index(), 42);
        assert_eq!(shard.hours(), 77_000);
        assert_eq!(key.minute(), 30);
        assert_eq!(key.second(), 15);
        assert_eq!(key.nanos(), 123_456_789);
        assert_eq!(key.counter(), 3);
        assert_eq!(key.process(), 7);

        assert_eq!(id.shard_index(), 42);
        assert_eq!(id.counter(), 3);
        assert_eq!(id.process(), 7);
        assert_eq!(ShardedId::from_halves(shard, key), id);
    }

    #[test]
    fn timestamp_decomposition_roundtrip() {
        let nanos = 77_000 * NANOS_PER_HOUR
            + 30 * NANOS_PER_MINUTE
            + 15 * NANOS_PER_SECOND
            + 123_456_789;
        let id = ShardedId::from_timestamp(42, nanos, 3, 7);
        assert_eq!(id.timestamp_nanos(), nanos);
        assert_eq!(to_epoch_nanos(id.datetime()), nanos);
        assert_eq!(id, ShardedId::from_components(42, 77_000, 30, 15, 123_456_789, 3, 7));
    }

    #[test]
    fn byte_order_matches_scalar_order() {
        let earlier = ShardedId::from_timestamp(1, 1_000, 0, u16::MAX);
        let later = ShardedId::from_timestamp(1, 1_001, 0, 0);
        assert!(earlier < later);
        assert!(earlier.to_raw().to_be_bytes() < later.to_raw().to_be_bytes());

        let same_ns = ShardedId::from_timestamp(1, 1_001, 1, 0);
        assert!(later < same_ns);
        assert!(later.to_raw().to_be_bytes() < same_ns.to_raw().to_be_bytes());
    }

    #[test]
    fn zero_check_detects_any_set_bit() {
        let zero = ShardedId::from_raw(0);
        assert!(zero.is_zero());
        for bit in 0..u128::BITS {
            let id = ShardedId::from_raw(1 << bit);
            assert!(!id.is_zero(), "bit {bit} should make the id nonzero");
        }
    }

    #[test]
    fn reserved_bits_validity() {
        let id = ShardedId::from_components(42, 77_000, 30, 15, 123_456_789, 3, 7);
        assert!(id.is_valid());

        let dirty = ShardedId::from_raw(id.to_raw() | (1 << (Shard::RESERVED_SHIFT + 64)));
        assert!(!dirty.is_valid());
        assert_eq!(dirty.into_valid(), id);
    }
}
