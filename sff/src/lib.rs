//! Elecbyte sprite containers (`.sff`).
//!
//! Versions 1.01, 1.02 and 2.00 are read. Records are walked lazily from the header's
//! first record offset and their images decoded on first use through the [`pcx`] crate.
mod collection;
pub mod error;
mod parser;
mod types;
mod writer;

pub use collection::SpriteCollection;
pub use parser::{parse_header, read_record};
pub use types::*;
pub use writer::{SffWriter, SpriteEntry, SpriteSource};
