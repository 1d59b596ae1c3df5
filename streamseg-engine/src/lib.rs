//! Streaming sentence segmentation
//!
//! Consumes text arriving in arbitrary chunks (for example tokens from a
//! language model) and yields sentence-sized fragments as early as they can
//! be confirmed, for feeding into speech synthesis.
//!
//! ```no_run
//! use streamseg_engine::{generate_sentences, SegmenterConfig};
//!
//! let chunks = ["Привет! Как ", "дела? Всё ", "хорошо."];
//! for fragment in generate_sentences(chunks, SegmenterConfig::default()).unwrap() {
//!     println!("{}", fragment.unwrap());
//! }
//! ```

pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;
pub mod finalize;
pub mod fragment;
pub mod input;
pub mod language;
pub mod segmenter;
pub mod stream;
pub mod tokenizer;

pub use channel::{spawn_segmenter, ChunkSender, SegmenterHandle};
pub use config::{BackendKind, ConfigBuilder, SegmenterConfig, TokenizerSettings};
pub use error::{BackendError, ConfigError, InitError, Result, SegmentError};
pub use fragment::{emit_push, Fragment, FragmentKind, SegmenterStats};
pub use input::CharStream;
pub use segmenter::{EmissionPhase, Segmenter};
pub use stream::{generate_sentences, segment_text, SentenceStream};
pub use tokenizer::{
    BackendRegistry, CustomTokenizer, Degradation, ModelSpec, Segmentation, TokenizerAdapter,
};

// Re-export from core for convenience
pub use streamseg_core::{DelimiterClass, DelimiterSets};
