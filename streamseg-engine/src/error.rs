//! Layered error types
//!
//! Configuration problems are fatal and surface before any character is
//! consumed. Tokenizer initialisation and invocation problems never are: they
//! degrade segmentation to passthrough. Stream errors reach the consumer.

use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Invalid configuration, reported at construction
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Backend identifier is not recognised
    #[error("unknown tokenizer backend '{0}' (expected 'custom' or 'model')")]
    UnknownBackend(String),

    /// The custom backend was selected without a callback
    #[error("custom tokenizer backend selected but no callback was supplied")]
    MissingCustomTokenizer,

    /// A field holds a value outside its domain
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Configuration field name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// TOML could not be parsed
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("failed to serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Tokenizer backend initialisation failure
///
/// Memoised by the backend registry, so it must be cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    /// Pack missing locally and fetching is disabled
    #[error("language pack '{language}' is not installed and offline mode is enabled")]
    PackUnavailable {
        /// Language code
        language: String,
    },

    /// No pack exists for the language
    #[error("no language pack for '{0}'")]
    UnknownLanguage(String),

    /// Pack TOML could not be parsed
    #[error("failed to parse language pack '{language}': {reason}")]
    PackParse {
        /// Language code
        language: String,
        /// Parser message
        reason: String,
    },

    /// Pack parsed but is unusable
    #[error("invalid language pack '{language}': {reason}")]
    PackInvalid {
        /// Language code
        language: String,
        /// Validation message
        reason: String,
    },

    /// Pack file could not be read
    #[error("language pack I/O error: {0}")]
    Io(String),
}

/// Failure of a single tokenizer invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend reported an error
    #[error("tokenizer failed: {0}")]
    Failed(String),

    /// Backend gave up after the given time
    #[error("tokenizer timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced to the consumer of a fragment stream
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Configuration was rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The chunk source failed; the stream ends without finalisation
    #[error("upstream source failed: {0}")]
    Upstream(Box<dyn std::error::Error + Send + Sync>),

    /// The producer went away without signalling end of input
    #[error("chunk source was dropped before end of input")]
    SourceAbandoned,

    /// The segmenter worker is no longer running
    #[error("segmenter worker has stopped")]
    WorkerStopped,
}

impl SegmentError {
    /// Wrap any upstream error
    pub fn upstream<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SegmentError::Upstream(err.into())
    }
}

impl From<std::io::Error> for SegmentError {
    fn from(err: std::io::Error) -> Self {
        SegmentError::Upstream(Box::new(err))
    }
}

impl From<Infallible> for SegmentError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, SegmentError>;
