mod halves;
mod interface;
mod sharded;

pub use halves::*;
pub use interface::*;
pub use sharded::*;
