use crate::base62::Base62Error;
use core::fmt;
use std::sync::{MutexGuard, PoisonError};

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `shardkey` can produce.
///
/// Identifier generation itself has no failure state: it either completes
/// synchronously or briefly spins waiting for the clock to advance. The only
/// runtime errors are a poisoned generator lock (std mutex builds) and
/// malformed text input to the decoder.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The operation failed due to a poisoned lock.
    ///
    /// This can happen if another thread panicked while holding the
    /// generator's lock. Cannot occur when the `parking-lot` feature is
    /// enabled.
    LockPoisoned,

    /// An error occurred during base-62 decoding.
    Base62(Base62Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockPoisoned => write!(f, "generator lock poisoned"),
            Self::Base62(err) => write!(f, "base62: {err}"),
        }
    }
}

impl core::error::Error for Error {}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

impl From<Base62Error> for Error {
    fn from(err: Base62Error) -> Self {
        Self::Base62(err)
    }
}
