use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize an ID as its native integer representation.
///
/// Intended for `#[serde(with = "shardkey::as_native")]` on struct fields
/// holding a [`ShardedId`], [`Shard`] or [`Key`].
///
/// [`ShardedId`]: crate::ShardedId
/// [`Shard`]: crate::Shard
/// [`Key`]: crate::Key
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::id::Id;

    /// Serialize an ID as a raw integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Id,
        ID::Ty: Serialize,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from a raw integer.
    ///
    /// Decoding is structural: reserved bits are not validated, matching
    /// the binary decode path.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Id,
        ID::Ty: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = <ID::Ty>::deserialize(d)?;
        Ok(ID::from_raw(raw))
    }
}

/// Serialize an ID as its fixed-width base-62 string form.
///
/// Intended for `#[serde(with = "shardkey::as_base62")]` on struct fields
/// holding a [`ShardedId`], [`Shard`] or [`Key`].
///
/// [`ShardedId`]: crate::ShardedId
/// [`Shard`]: crate::Shard
/// [`Key`]: crate::Key
pub mod as_base62 {
    use super::{Deserializer, Serializer};
    use crate::base62::{Base62Ext, BeBytes};

    /// Serialize an ID as a base-62 encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Base62Ext,
        ID::Ty: BeBytes,
        S: Serializer,
    {
        s.serialize_str(id.encode().as_str())
    }

    /// Deserialize an ID from a base-62 encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not valid base-62 (wrong length, byte outside the
    ///   alphabet, or a value wider than the backing scalar)
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Base62Ext,
        ID::Ty: BeBytes,
        D: Deserializer<'de>,
    {
        struct Base62Visitor<ID>(core::marker::PhantomData<ID>);

        impl<ID> serde::de::Visitor<'_> for Base62Visitor<ID>
        where
            ID: Base62Ext,
            ID::Ty: BeBytes,
        {
            type Value = ID;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base62 encoded string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ID::decode(v).map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(Base62Visitor(core::marker::PhantomData))
    }
}
