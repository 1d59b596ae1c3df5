//! Pure building blocks for streaming sentence segmentation
//!
//! This crate holds the deterministic pieces of the segmenter that need no
//! I/O: delimiter classification, the boundary heuristic used before any
//! tokenizer call, and the text cleaning applied to every emitted fragment.

#![warn(missing_docs)]

pub mod boundary;
pub mod classifier;
pub mod clean;
pub mod error;

pub use boundary::is_likely_boundary;
pub use classifier::{DelimiterClass, DelimiterClassifier, DelimiterSets};
pub use clean::{clean_text, strip_emojis};
pub use error::{CoreError, Result};
