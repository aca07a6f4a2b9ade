use core::fmt;

/// Errors produced when decoding a base-62 string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base62Error {
    /// The input length does not match the fixed width of the target type.
    DecodeInvalidLen { len: usize },
    /// The input contains a byte outside the 62-symbol alphabet.
    DecodeInvalidAscii { byte: u8, index: usize },
    /// The decoded value does not fit the target type.
    DecodeOverflow,
}

impl fmt::Display for Base62Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeInvalidLen { len } => write!(f, "invalid length: {len}"),
            Self::DecodeInvalidAscii { byte, index } => {
                write!(f, "invalid ascii byte {byte} at index {index}")
            }
            Self::DecodeOverflow => write!(f, "decoded value out of range"),
        }
    }
}

impl core::error::Error for Base62Error {}
