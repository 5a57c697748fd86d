//! Byte-stream primitives shared by the Fernwood crates.
//!
//! Every on-disk format in the engine (the data bundle, save files) is
//! little-endian, so the reader and writer traits only expose `_le`
//! accessors.

pub mod reader;
pub mod writer;

pub use reader::{DataReader, IoDataReader};
pub use writer::{DataWriter, IoDataWriter};
