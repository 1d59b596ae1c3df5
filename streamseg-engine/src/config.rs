//! Segmenter configuration
//!
//! A [`SegmenterConfig`] is fixed for the lifetime of one stream. It can be
//! assembled with [`SegmenterConfig::builder`] or loaded from TOML, where
//! every field is optional and falls back to [`defaults`].

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use streamseg_core::DelimiterSets;

/// Default configuration values
pub mod defaults {
    /// Lookback offset from the end of the buffer
    pub const CONTEXT_SIZE: usize = 15;
    /// Width of the diagnostic window before the lookback position
    pub const CONTEXT_LOOKBACK: usize = 8;
    /// Minimum confirmed sentence length
    pub const MIN_SENTENCE_LENGTH: usize = 12;
    /// Minimum buffer length for the first-fragment fast path
    pub const MIN_FIRST_FRAGMENT_LENGTH: usize = 8;
    /// Hard cap on buffered characters
    pub const MAX_BUFFER_SIZE: usize = 700;
    /// Base tokenizer throttling interval
    pub const TOKENIZATION_INTERVAL: usize = 6;
    /// Text required after a lookback candidate
    pub const MIN_CHARS_AFTER_DELIMITER: usize = 25;
    /// Word count that forces the first fragment at whitespace
    pub const FORCE_FIRST_FRAGMENT_AFTER_WORDS: usize = 15;
    /// Word count decrement applied after a forced split
    pub const FORCED_SPLIT_WORD_CORRECTION: usize = 6;
    /// Tokenizer output shorter than this is merged forward
    pub const SHORT_SENTENCE_MERGE_LENGTH: usize = 10;
    /// Throttle multiplier for weak delimiters
    pub const WEAK_PAUSE_RATIO: f64 = 0.6;
    /// Throttle multiplier for strong delimiters
    pub const STRONG_PAUSE_RATIO: f64 = 1.0;
    /// Tokenizer language
    pub const LANGUAGE: &str = "ru";
}

/// Tokenizer backend identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    /// User-supplied callback
    Custom,
    /// Rule-based model driven by a language pack
    #[default]
    Model,
}

impl BackendKind {
    /// Canonical identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Custom => "custom",
            BackendKind::Model => "model",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" | "callback" => Ok(BackendKind::Custom),
            "model" | "stanza" | "nltk" => Ok(BackendKind::Model),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokenizer selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizerSettings {
    /// Backend to use
    pub backend: BackendKind,
    /// Language code for the model backend
    pub language: String,
    /// Never install missing language packs
    pub offline: bool,
    /// Directory holding installed language packs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            language: defaults::LANGUAGE.to_string(),
            offline: false,
            data_dir: None,
        }
    }
}

/// Configuration for one segmentation stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmenterConfig {
    /// Lookback offset from the end of the buffer
    pub context_size: usize,
    /// Width of the diagnostic window before the lookback position
    pub context_lookback: usize,
    /// Minimum confirmed sentence length
    pub min_sentence_length: usize,
    /// Minimum buffer length for the first-fragment fast path
    pub min_first_fragment_length: usize,
    /// Hard cap on buffered characters
    pub max_buffer_size: usize,
    /// Base tokenizer throttling interval
    pub tokenization_interval: usize,
    /// Text required after a lookback candidate
    pub min_chars_after_delimiter: usize,
    /// Word count that forces the first fragment at whitespace
    pub force_first_fragment_after_words: usize,
    /// Word count decrement applied after a forced split
    pub forced_split_word_correction: usize,
    /// Tokenizer output shorter than this is merged forward
    pub short_sentence_merge_length: usize,

    /// Emit the first fragment as early as possible
    pub quick_yield_first_fragment: bool,
    /// Re-enter the fast path after every confirmation
    pub quick_yield_all_sentences: bool,
    /// Stay on the fast path for the whole stream
    pub quick_yield_every_fragment: bool,
    /// Only delimiters may be lookback candidates
    pub strict_punctuation_mode: bool,
    /// Drop non-alphanumeric characters at the start of a buffer
    pub filter_leading_non_alnum: bool,
    /// Treat line breaks as soft for the model backend
    pub poetic_mode: bool,
    /// With poetic mode, every non-blank line is a sentence
    pub preserve_line_breaks: bool,
    /// Strip emoji from emitted fragments
    pub cleanup_text_emojis: bool,
    /// Echo every consumed character to stderr
    pub log_characters: bool,
    /// Log emission decisions at debug level
    pub debug: bool,

    /// Delimiter sets
    pub delimiters: DelimiterSets,
    /// Tokenizer selection
    pub tokenizer: TokenizerSettings,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            context_size: defaults::CONTEXT_SIZE,
            context_lookback: defaults::CONTEXT_LOOKBACK,
            min_sentence_length: defaults::MIN_SENTENCE_LENGTH,
            min_first_fragment_length: defaults::MIN_FIRST_FRAGMENT_LENGTH,
            max_buffer_size: defaults::MAX_BUFFER_SIZE,
            tokenization_interval: defaults::TOKENIZATION_INTERVAL,
            min_chars_after_delimiter: defaults::MIN_CHARS_AFTER_DELIMITER,
            force_first_fragment_after_words: defaults::FORCE_FIRST_FRAGMENT_AFTER_WORDS,
            forced_split_word_correction: defaults::FORCED_SPLIT_WORD_CORRECTION,
            short_sentence_merge_length: defaults::SHORT_SENTENCE_MERGE_LENGTH,
            quick_yield_first_fragment: true,
            quick_yield_all_sentences: false,
            quick_yield_every_fragment: false,
            strict_punctuation_mode: true,
            filter_leading_non_alnum: true,
            poetic_mode: false,
            preserve_line_breaks: false,
            cleanup_text_emojis: false,
            log_characters: false,
            debug: false,
            delimiters: DelimiterSets::default(),
            tokenizer: TokenizerSettings::default(),
        }
    }
}

impl SegmenterConfig {
    /// Start a builder from the defaults
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Apply the flag implications: every fragment implies all sentences,
    /// which implies the first fragment
    pub fn normalized(mut self) -> Self {
        if self.quick_yield_every_fragment {
            self.quick_yield_all_sentences = true;
        }
        if self.quick_yield_all_sentences {
            self.quick_yield_first_fragment = true;
        }
        self
    }

    /// Check value domains
    ///
    /// Overlapping delimiter sets are only logged; classification resolves
    /// them by precedence.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.context_size == 0 {
            return Err(invalid("context_size", "must be greater than zero"));
        }
        if self.max_buffer_size < 2 {
            return Err(invalid("max_buffer_size", "must be at least 2"));
        }
        if self.min_first_fragment_length == 0 {
            return Err(invalid(
                "min_first_fragment_length",
                "must be greater than zero",
            ));
        }
        if self.tokenizer.language.trim().is_empty() {
            return Err(invalid("tokenizer.language", "must not be empty"));
        }

        if let Err(e) = self.delimiters.check_disjoint() {
            log::warn!("{e}; precedence strong > weak > ignored applies");
        }

        Ok(())
    }

    /// Parse, validate and normalise a TOML document
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: SegmenterConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config.normalized())
    }

    /// Read a TOML configuration file
    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Length at or below which no lookback is attempted
    pub(crate) fn accumulation_floor(&self) -> usize {
        self.min_sentence_length + self.context_size
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

/// Fluent builder for [`SegmenterConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: SegmenterConfig,
}

macro_rules! setters {
    ($($(#[$meta:meta])* $name:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name(mut self, value: $ty) -> Self {
                self.config.$name = value;
                self
            }
        )*
    };
}

impl ConfigBuilder {
    /// Create a builder holding the defaults
    pub fn new() -> Self {
        Self::default()
    }

    setters! {
        /// Set the lookback offset
        context_size: usize,
        /// Set the diagnostic window width
        context_lookback: usize,
        /// Set the minimum confirmed sentence length
        min_sentence_length: usize,
        /// Set the minimum first fragment length
        min_first_fragment_length: usize,
        /// Set the buffer cap
        max_buffer_size: usize,
        /// Set the throttling interval
        tokenization_interval: usize,
        /// Set the text required after a lookback candidate
        min_chars_after_delimiter: usize,
        /// Set the word count forcing the first fragment
        force_first_fragment_after_words: usize,
        /// Set the word count decrement after a forced split
        forced_split_word_correction: usize,
        /// Set the tokenizer merge threshold
        short_sentence_merge_length: usize,
        /// Toggle the first-fragment fast path
        quick_yield_first_fragment: bool,
        /// Toggle the fast path after every confirmation
        quick_yield_all_sentences: bool,
        /// Toggle the fast path for the whole stream
        quick_yield_every_fragment: bool,
        /// Toggle strict punctuation mode
        strict_punctuation_mode: bool,
        /// Toggle the leading character filter
        filter_leading_non_alnum: bool,
        /// Toggle poetic mode
        poetic_mode: bool,
        /// Toggle line preservation in poetic mode
        preserve_line_breaks: bool,
        /// Toggle emoji stripping
        cleanup_text_emojis: bool,
        /// Toggle character echo
        log_characters: bool,
        /// Toggle decision logging
        debug: bool,
        /// Replace the delimiter sets
        delimiters: DelimiterSets,
    }

    /// Select the backend by identifier
    pub fn backend(mut self, id: &str) -> ConfigResult<Self> {
        self.config.tokenizer.backend = id.parse()?;
        Ok(self)
    }

    /// Select the backend
    pub fn backend_kind(mut self, kind: BackendKind) -> Self {
        self.config.tokenizer.backend = kind;
        self
    }

    /// Set the tokenizer language
    pub fn language(mut self, code: impl Into<String>) -> Self {
        self.config.tokenizer.language = code.into();
        self
    }

    /// Forbid installing language packs
    pub fn offline(mut self, offline: bool) -> Self {
        self.config.tokenizer.offline = offline;
        self
    }

    /// Set the language pack directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tokenizer.data_dir = Some(dir.into());
        self
    }

    /// Validate and normalise
    pub fn build(self) -> ConfigResult<SegmenterConfig> {
        self.config.validate()?;
        Ok(self.config.normalized())
    }
}
