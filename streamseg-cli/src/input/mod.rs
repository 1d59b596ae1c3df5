//! Input handling module

pub mod chunk_reader;
pub mod glob_resolver;

pub use chunk_reader::ChunkReader;
pub use glob_resolver::{resolve_inputs, InputSource};
