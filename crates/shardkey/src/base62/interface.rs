use crate::base62::{Base62Error, BeBytes};
use crate::error::{Error, Result};
use crate::id::Id;

/// Extension trait for types that support order-preserving base-62 encoding
/// and decoding.
///
/// This trait converts IDs (backed by `u64` or `u128`) to and from
/// fixed-length, lexicographically sortable strings over the alphabet
/// `0-9A-Za-z`. Because the alphabet is in ascending ASCII order and the
/// output width is fixed, comparing two encoded strings gives the same
/// result as comparing the raw values byte-wise, making the encoded form safe
/// to use as an ordered store key or in URLs.
pub trait Base62Ext: Id
where
    Self::Ty: BeBytes,
{
    /// Encodes this ID into a [`String`].
    ///
    /// The output is always ASCII, always exactly
    /// [`BeBytes::BASE62_SIZE`] bytes long, and zero-padded on the left.
    ///
    /// # Example
    ///
    /// ```
    /// use shardkey::{Base62Ext, Key, ShardedId};
    ///
    /// let id = ShardedId::from_raw(1);
    /// assert_eq!(id.encode(), "0000000000000000000001");
    ///
    /// let key = Key::from_raw(u64::MAX);
    /// assert_eq!(key.encode(), "LygHa16AHYF");
    /// ```
    fn encode(&self) -> String {
        let mut buf = <Self::Ty as BeBytes>::Base62Array::default();
        self.encode_to_buf(&mut buf);

        // SAFETY: base-62 output is always valid ASCII
        unsafe { String::from_utf8_unchecked(buf.as_ref().to_vec()) }
    }

    /// Encodes this ID into the provided output buffer without heap
    /// allocation.
    ///
    /// This is the zero-allocation alternative to [`Base62Ext::encode`]. The
    /// output buffer is exactly [`BeBytes::BASE62_SIZE`] bytes, guaranteed
    /// at compile time by [`BeBytes::Base62Array`].
    fn encode_to_buf(&self, buf: &mut <Self::Ty as BeBytes>::Base62Array) {
        super::encode_base62(self.to_raw().widen(), buf.as_mut());
    }

    /// Decodes a base-62 string back into an ID.
    ///
    /// This is a structural decode: it does **not** validate semantic
    /// invariants such as reserved bits. Use `is_valid()` / `into_valid()`
    /// on the decoded value if strictness is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the input string:
    /// - is not the expected fixed length
    /// - contains a byte outside the base-62 alphabet
    /// - decodes to a value wider than the backing scalar
    ///
    /// # Example
    ///
    /// ```
    /// use shardkey::{Base62Ext, ShardedId};
    ///
    /// let id = ShardedId::from_raw(0x2a);
    /// let decoded = ShardedId::decode(&id.encode()).unwrap();
    /// assert_eq!(id, decoded);
    /// ```
    fn decode(s: &str) -> Result<Self> {
        if s.len() != Self::Ty::BASE62_SIZE {
            return Err(Error::Base62(Base62Error::DecodeInvalidLen { len: s.len() }));
        }
        let raw = super::decode_base62(s)?;
        let narrowed = <Self::Ty as BeBytes>::narrow(raw)
            .ok_or(Error::Base62(Base62Error::DecodeOverflow))?;
        Ok(Self::from_raw(narrowed))
    }
}

impl<ID> Base62Ext for ID
where
    ID: Id,
    ID::Ty: BeBytes,
{
}
