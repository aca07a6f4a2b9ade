mod be_bytes;
mod codec;
mod error;
mod interface;

pub use be_bytes::*;
use codec::*;
pub use error::*;
pub use interface::*;
