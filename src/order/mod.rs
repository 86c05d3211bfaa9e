pub mod decoder;
pub mod types;

pub use decoder::try_from_bytes;
pub use types::*;
