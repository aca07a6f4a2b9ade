use crate::base62::BeBytes;
use core::fmt;
use core::hash::Hash;

/// A trait for types that wrap a primitive scalar identifier.
///
/// This is used to abstract over the raw scalar type behind an ID (`u64` for
/// the halves, `u128` for the full identifier) so that the text codec and
/// serde helpers can be written once for all three value types.
pub trait Id:
    Copy + Clone + fmt::Display + PartialOrd + Ord + PartialEq + Eq + Hash + fmt::Debug
{
    /// Scalar type backing all bit fields (`u64` or `u128`).
    type Ty: Copy
        + Clone
        + Default
        + fmt::Debug
        + fmt::Display
        + Ord
        + PartialOrd
        + Eq
        + PartialEq
        + Hash
        + BeBytes;

    /// Converts this type into its raw type representation
    fn to_raw(&self) -> Self::Ty;

    /// Converts a raw type into this type
    fn from_raw(raw: Self::Ty) -> Self;
}
