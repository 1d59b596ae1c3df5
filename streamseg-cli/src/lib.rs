//! streamseg CLI library
//!
//! Command-line front end for the streaming sentence segmenter: reads files
//! or stdin in small chunks, feeds them through the engine and writes the
//! fragments in the requested format.

pub mod commands;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
