//! Batch sentence tokenizer adapter
//!
//! The segmenter confirms candidate boundaries by tokenizing its whole
//! buffer. Backends never fail the stream: an unavailable or failing backend
//! yields [`Segmentation::Passthrough`], which the segmenter treats as a
//! single sentence.

pub mod custom;
pub mod model;
pub mod registry;

pub use custom::CustomTokenizer;
pub use model::SentenceModel;
pub use registry::{BackendRegistry, ModelSpec};

use crate::config::{BackendKind, SegmenterConfig};
use crate::error::{ConfigError, ConfigResult, InitError};
use std::slice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a tokenizer call fell back to passthrough
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Backend could not be initialised
    #[error("tokenizer backend unavailable: {0}")]
    BackendUnavailable(InitError),

    /// Backend failed on this input
    #[error("tokenizer invocation failed: {0}")]
    InvocationFailed(String),

    /// Backend gave up
    #[error("tokenizer timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of tokenizing one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmentation {
    /// Tokenizer output after the merge post-pass; never empty
    Sentences(Vec<String>),
    /// The input text, unsplit
    Passthrough {
        text: String,
        reason: Degradation,
    },
}

impl Segmentation {
    /// Sentences, with passthrough as a single entry
    pub fn sentences(&self) -> &[String] {
        match self {
            Segmentation::Sentences(sentences) => sentences,
            Segmentation::Passthrough { text, .. } => slice::from_ref(text),
        }
    }

    pub fn into_sentences(self) -> Vec<String> {
        match self {
            Segmentation::Sentences(sentences) => sentences,
            Segmentation::Passthrough { text, .. } => vec![text],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Segmentation::Passthrough { .. })
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Segmentation::Passthrough { reason, .. } => Some(reason),
            Segmentation::Sentences(_) => None,
        }
    }
}

/// Handle to a possibly unavailable sentence model
#[derive(Debug, Clone)]
pub struct ModelHandle {
    model: Result<Arc<SentenceModel>, InitError>,
}

impl ModelHandle {
    /// Resolve through a registry
    pub fn resolve(spec: &ModelSpec, registry: &BackendRegistry) -> Self {
        Self {
            model: registry.get_or_init(spec),
        }
    }

    /// Wrap an already built model
    pub fn ready(model: SentenceModel) -> Self {
        Self {
            model: Ok(Arc::new(model)),
        }
    }

    /// A handle whose initialisation failed
    pub fn unavailable(error: InitError) -> Self {
        Self { model: Err(error) }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_ok()
    }
}

/// Interchangeable tokenizer backends
#[derive(Debug, Clone)]
pub enum TokenizerBackend {
    /// User callback, always given the raw text
    Custom(CustomTokenizer),
    /// Language pack model
    Model(ModelHandle),
}

/// Tokenizer with pre-processing and the short-sentence merge post-pass
#[derive(Debug)]
pub struct TokenizerAdapter {
    backend: TokenizerBackend,
    poetic_mode: bool,
    preserve_line_breaks: bool,
    merge_below: usize,
    warned: AtomicBool,
}

impl TokenizerAdapter {
    pub fn new(backend: TokenizerBackend, config: &SegmenterConfig) -> Self {
        Self {
            backend,
            poetic_mode: config.poetic_mode,
            preserve_line_breaks: config.preserve_line_breaks,
            merge_below: config.short_sentence_merge_length,
            warned: AtomicBool::new(false),
        }
    }

    /// Adapter around a user callback
    pub fn custom(tokenizer: CustomTokenizer, config: &SegmenterConfig) -> Self {
        Self::new(TokenizerBackend::Custom(tokenizer), config)
    }

    /// Adapter for the configured backend, resolving models through `registry`
    ///
    /// The custom backend cannot be built from settings alone.
    pub fn from_settings(
        config: &SegmenterConfig,
        registry: &BackendRegistry,
    ) -> ConfigResult<Self> {
        match config.tokenizer.backend {
            BackendKind::Custom => Err(ConfigError::MissingCustomTokenizer),
            BackendKind::Model => {
                let spec = ModelSpec::from_settings(&config.tokenizer);
                let handle = ModelHandle::resolve(&spec, registry);
                Ok(Self::new(TokenizerBackend::Model(handle), config))
            }
        }
    }

    pub fn backend(&self) -> &TokenizerBackend {
        &self.backend
    }

    /// Whether calls can produce real splits
    pub fn is_available(&self) -> bool {
        match &self.backend {
            TokenizerBackend::Custom(_) => true,
            TokenizerBackend::Model(handle) => handle.is_available(),
        }
    }

    /// Tokenize `text`
    pub fn segment(&self, text: &str) -> Segmentation {
        let raw = match &self.backend {
            TokenizerBackend::Custom(tokenizer) => tokenizer.call(text),
            TokenizerBackend::Model(handle) => self.run_model(handle, text),
        };

        match raw {
            Ok(sentences) => Segmentation::Sentences(merge_short_sentences(
                sentences,
                self.merge_below,
                text,
            )),
            Err(reason) => {
                self.report(&reason);
                Segmentation::Passthrough {
                    text: text.to_string(),
                    reason,
                }
            }
        }
    }

    fn run_model(&self, handle: &ModelHandle, text: &str) -> Result<Vec<String>, Degradation> {
        if self.poetic_mode && self.preserve_line_breaks {
            return Ok(text
                .split('\n')
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect());
        }

        let model = handle
            .model
            .as_ref()
            .map_err(|e| Degradation::BackendUnavailable(e.clone()))?;

        if self.poetic_mode {
            Ok(model.split(&text.replace('\n', " ")))
        } else {
            Ok(model.split(text))
        }
    }

    fn report(&self, reason: &Degradation) {
        match reason {
            Degradation::BackendUnavailable(_) => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    log::warn!("{reason}; falling back to raw text");
                }
            }
            _ => log::warn!("{reason}; returning raw text"),
        }
    }
}

/// Merge entries shorter than `min_len` characters into the following one
///
/// The merged list replaces `raw` only when it is shorter. An empty result
/// falls back to the original `text`.
pub fn merge_short_sentences(raw: Vec<String>, min_len: usize, text: &str) -> Vec<String> {
    let mut merged = Vec::new();
    let mut pending = String::new();

    for sentence in &raw {
        if sentence.chars().count() < min_len {
            pending.push_str(sentence);
            pending.push(' ');
        } else if pending.is_empty() {
            merged.push(sentence.trim().to_string());
        } else {
            pending.push_str(sentence);
            merged.push(pending.trim().to_string());
            pending.clear();
        }
    }
    if !pending.is_empty() {
        merged.push(pending.trim().to_string());
    }

    let result = if !merged.is_empty() && merged.len() < raw.len() {
        merged
    } else {
        raw
    };

    if result.is_empty() {
        vec![text.to_string()]
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::language::bundled_pack;

    fn s(items: &[&str]) -> Vec<String> {
        items.iter().map(|i| i.to_string()).collect()
    }

    fn model_adapter(config: &SegmenterConfig) -> TokenizerAdapter {
        let model = SentenceModel::from_pack(&bundled_pack("ru").unwrap());
        TokenizerAdapter::new(TokenizerBackend::Model(ModelHandle::ready(model)), config)
    }

    #[test]
    fn test_merge_short_sentences() {
        let merged = merge_short_sentences(s(&["Да.", "Нет.", "Возможно, завтра."]), 10, "");
        assert_eq!(merged, s(&["Да. Нет. Возможно, завтра."]));

        let merged = merge_short_sentences(s(&["A long first sentence.", "Ok."]), 10, "");
        assert_eq!(merged, s(&["A long first sentence.", "Ok."]));
    }

    #[test]
    fn test_merge_keeps_raw_when_not_shorter() {
        let raw = s(&["First long sentence.", "Second long sentence."]);
        assert_eq!(merge_short_sentences(raw.clone(), 10, ""), raw);
    }

    #[test]
    fn test_merge_empty_falls_back_to_text() {
        assert_eq!(merge_short_sentences(Vec::new(), 10, "raw"), s(&["raw"]));
    }

    #[test]
    fn test_model_segmentation_merges() {
        let adapter = model_adapter(&SegmenterConfig::default());
        let result = adapter.segment("Привет! Как дела? Отлично, спасибо.");
        assert_eq!(
            result,
            Segmentation::Sentences(s(&["Привет! Как дела? Отлично, спасибо."]))
        );
    }

    #[test]
    fn test_poetic_modes() {
        let config = SegmenterConfig::builder()
            .poetic_mode(true)
            .preserve_line_breaks(true)
            .short_sentence_merge_length(0)
            .build()
            .unwrap();
        let adapter = model_adapter(&config);
        assert_eq!(
            adapter.segment("Белеет парус\n\nодинокий\n").sentences(),
            &s(&["Белеет парус", "одинокий"])[..]
        );

        let config = SegmenterConfig::builder()
            .poetic_mode(true)
            .short_sentence_merge_length(0)
            .build()
            .unwrap();
        let adapter = model_adapter(&config);
        assert_eq!(
            adapter.segment("Белеет парус\nодинокий.").sentences(),
            &s(&["Белеет парус одинокий."])[..]
        );
    }

    #[test]
    fn test_unavailable_model_passthrough() {
        let handle = ModelHandle::unavailable(InitError::PackUnavailable {
            language: "ru".to_string(),
        });
        let adapter = TokenizerAdapter::new(
            TokenizerBackend::Model(handle),
            &SegmenterConfig::default(),
        );
        assert!(!adapter.is_available());

        let result = adapter.segment("Один. Два.");
        assert!(result.is_degraded());
        assert_eq!(result.sentences(), &s(&["Один. Два."])[..]);
        assert!(matches!(
            result.degradation(),
            Some(Degradation::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_custom_sees_raw_text_in_poetic_mode() {
        let config = SegmenterConfig::builder()
            .poetic_mode(true)
            .short_sentence_merge_length(0)
            .build()
            .unwrap();
        let tokenizer = CustomTokenizer::infallible(|text| vec![text.to_string()]);
        let adapter = TokenizerAdapter::custom(tokenizer, &config);
        assert_eq!(adapter.segment("a\nb").into_sentences(), s(&["a\nb"]));
    }

    #[test]
    fn test_custom_failure_passthrough() {
        let tokenizer = CustomTokenizer::new(|_| Err(BackendError::Failed("down".into())));
        let adapter = TokenizerAdapter::custom(tokenizer, &SegmenterConfig::default());
        let result = adapter.segment("text");
        assert_eq!(
            result,
            Segmentation::Passthrough {
                text: "text".to_string(),
                reason: Degradation::InvocationFailed("down".to_string()),
            }
        );
    }

    #[test]
    fn test_from_settings_requires_callback_for_custom() {
        let config = SegmenterConfig::builder()
            .backend_kind(BackendKind::Custom)
            .build()
            .unwrap();
        let registry = BackendRegistry::new();
        assert!(matches!(
            TokenizerAdapter::from_settings(&config, &registry),
            Err(ConfigError::MissingCustomTokenizer)
        ));
    }
}
