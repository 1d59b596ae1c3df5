//! Emission policy
//!
//! [`Segmenter`] is a synchronous state machine fed one character at a time.
//! After the buffer step each character goes through, in order: the
//! first-fragment fast path, the accumulation gate, the lookback candidate
//! check, the tokenizer throttle, and finally tokenizer confirmation.

use crate::buffer::{Append, SegmentBuffer};
use crate::config::{defaults, SegmenterConfig};
use crate::error::ConfigResult;
use crate::finalize::join_for_emission;
use crate::fragment::{Fragment, FragmentKind, SegmenterStats};
use crate::tokenizer::{BackendRegistry, CustomTokenizer, Segmentation, TokenizerAdapter};
use streamseg_core::{clean_text, is_likely_boundary, DelimiterClass, DelimiterClassifier};

/// A first fragment ending in a comma needs this much trimmed text
const MIN_COMMA_FIRST_FRAGMENT: usize = 6;

/// Where a stream is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPhase {
    /// The fast path is armed
    AwaitingFirstFragment,
    /// Only tokenizer confirmation and forced splits emit
    Steady,
    /// End of input is being processed
    Draining,
    /// Finished; further input is ignored
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundaryStrength {
    Weak,
    Strong,
}

impl BoundaryStrength {
    fn check_interval(self, base: usize) -> usize {
        match self {
            BoundaryStrength::Weak => ((base as f64 * defaults::WEAK_PAUSE_RATIO) as usize).max(1),
            BoundaryStrength::Strong => (base as f64 * defaults::STRONG_PAUSE_RATIO) as usize,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FirstTrigger {
    Delimiter,
    WordLimit,
}

/// Streaming sentence segmenter for one input stream
#[derive(Debug)]
pub struct Segmenter {
    config: SegmenterConfig,
    classifier: DelimiterClassifier,
    tokenizer: TokenizerAdapter,
    buffer: SegmentBuffer,
    phase: EmissionPhase,
    emitted: usize,
    stats: SegmenterStats,
}

impl Segmenter {
    /// Create a segmenter with an explicit tokenizer
    pub fn new(config: SegmenterConfig, tokenizer: TokenizerAdapter) -> ConfigResult<Self> {
        config.validate()?;
        let config = config.normalized();

        let phase = if config.quick_yield_first_fragment {
            EmissionPhase::AwaitingFirstFragment
        } else {
            EmissionPhase::Steady
        };

        if config.debug {
            log::debug!(
                "Segmenter ready: tokenizer available: {}, phase: {phase:?}",
                tokenizer.is_available()
            );
        }

        Ok(Self {
            classifier: DelimiterClassifier::new(&config.delimiters),
            tokenizer,
            buffer: SegmentBuffer::new(),
            phase,
            emitted: 0,
            stats: SegmenterStats::default(),
            config,
        })
    }

    /// Create a segmenter for the configured backend using the global registry
    pub fn from_config(config: SegmenterConfig) -> ConfigResult<Self> {
        Self::with_registry(config, BackendRegistry::global())
    }

    /// Create a segmenter resolving models through `registry`
    pub fn with_registry(config: SegmenterConfig, registry: &BackendRegistry) -> ConfigResult<Self> {
        let tokenizer = TokenizerAdapter::from_settings(&config, registry)?;
        Self::new(config, tokenizer)
    }

    /// Create a segmenter around a user callback
    pub fn with_custom_tokenizer(
        config: SegmenterConfig,
        tokenizer: CustomTokenizer,
    ) -> ConfigResult<Self> {
        let adapter = TokenizerAdapter::custom(tokenizer, &config);
        Self::new(config, adapter)
    }

    /// Process one character
    pub fn step(&mut self, ch: char, emit: &mut impl FnMut(Fragment)) {
        if matches!(self.phase, EmissionPhase::Draining | EmissionPhase::Done) {
            log::warn!("Character {ch:?} received after end of input; ignoring");
            return;
        }
        self.stats.chars_consumed += 1;

        let class = self.classifier.classify(ch);
        match self.buffer.push(ch, class, &self.config) {
            Append::Filtered => return,
            Append::Overflow(forced) => {
                self.stats.forced_splits += 1;
                self.stats.emission_events += 1;
                if self.config.debug {
                    log::debug!("Buffer exceeded {} chars; forcing a split", self.config.max_buffer_size);
                }
                self.emit(&forced, FragmentKind::Forced, emit);
                return;
            }
            Append::Appended => {}
        }

        if self.config.debug {
            log::trace!(
                "Buffer size: {}, words: {}",
                self.buffer.len(),
                self.buffer.word_count()
            );
        }

        if self.phase == EmissionPhase::AwaitingFirstFragment
            && self.buffer.len() >= self.config.min_first_fragment_length
        {
            if let Some(trigger) = self.first_fragment_trigger(ch) {
                if self.buffer.last() == Some(',')
                    && self.buffer.trimmed_len() < MIN_COMMA_FIRST_FRAGMENT
                {
                    return;
                }
                self.emit_first_fragment(trigger, emit);
                return;
            }
        }

        if self.buffer.len() <= self.config.accumulation_floor() {
            return;
        }

        if class == DelimiterClass::Strong {
            self.buffer.mark_strong_delimiter();
        }

        let Some(strength) = self.lookback_candidate() else {
            return;
        };

        let interval = strength.check_interval(self.config.tokenization_interval);
        if self.buffer.bump_tokenization_counter() < interval {
            return;
        }
        self.buffer.reset_tokenization_counter();

        self.confirm(emit);
    }

    /// Process every character of a chunk
    pub fn push_str(&mut self, chunk: &str, emit: &mut impl FnMut(Fragment)) {
        for ch in chunk.chars() {
            self.step(ch, emit);
        }
    }

    /// Drain the buffer at end of input
    pub fn finish(&mut self, emit: &mut impl FnMut(Fragment)) {
        if self.phase == EmissionPhase::Done {
            return;
        }
        self.phase = EmissionPhase::Draining;

        if !self.buffer.is_empty() {
            let remainder = self.buffer.take_remainder();
            let segmentation = self.segment(&remainder);
            for group in join_for_emission(segmentation.sentences(), self.config.min_sentence_length) {
                self.emit(&group, FragmentKind::Final, emit);
            }
        }

        self.phase = EmissionPhase::Done;
        if self.config.debug {
            log::debug!("Stream finished: {:?}", self.stats);
        }
    }

    fn first_fragment_trigger(&self, ch: char) -> Option<FirstTrigger> {
        if self
            .buffer
            .last()
            .is_some_and(|last| self.classifier.is_fragment_delimiter(last))
        {
            Some(FirstTrigger::Delimiter)
        } else if ch.is_whitespace()
            && self.buffer.word_count() >= self.config.force_first_fragment_after_words
        {
            Some(FirstTrigger::WordLimit)
        } else {
            None
        }
    }

    fn emit_first_fragment(&mut self, trigger: FirstTrigger, emit: &mut impl FnMut(Fragment)) {
        let text = self.buffer.text();
        if self.config.debug {
            match trigger {
                FirstTrigger::Delimiter => log::debug!("First fragment at delimiter: {text:?}"),
                FirstTrigger::WordLimit => log::debug!("First fragment at word limit: {text:?}"),
            }
        }

        self.buffer.reset_after_emit();
        self.stats.emission_events += 1;
        if !self.config.quick_yield_every_fragment {
            self.phase = EmissionPhase::Steady;
        }
        self.emit(&text, FragmentKind::FirstFragment, emit);
    }

    fn lookback_candidate(&self) -> Option<BoundaryStrength> {
        let position = self.buffer.len().checked_sub(self.config.context_size)?;
        let ch = self.buffer.char_at(position)?;
        let class = self.classifier.classify(ch);

        if self.config.strict_punctuation_mode {
            if !class.is_fragment_delimiter() {
                return None;
            }
        } else if class == DelimiterClass::Ignored {
            return None;
        }

        let strength = if self.classifier.is_lookback_weak(ch) {
            BoundaryStrength::Weak
        } else if class == DelimiterClass::Strong {
            BoundaryStrength::Strong
        } else {
            return None;
        };

        if self.config.context_size.saturating_sub(1) < self.config.min_chars_after_delimiter {
            return None;
        }

        if !is_likely_boundary(self.buffer.as_slice(), position) {
            if self.config.debug {
                log::debug!("Rejected {ch:?} at {position}: not a likely boundary");
            }
            return None;
        }

        if self.config.debug {
            let start = position.saturating_sub(self.config.context_lookback);
            let window: String = self.buffer.as_slice()[start..position].iter().collect();
            log::debug!("Candidate {strength:?} delimiter {ch:?} at {position} after {window:?}");
        }

        Some(strength)
    }

    fn confirm(&mut self, emit: &mut impl FnMut(Fragment)) {
        let text = self.buffer.text();
        let segmentation = self.segment(&text);
        let sentences = segmentation.sentences();

        if self.config.debug {
            log::debug!("Tokenizer found {} sentence(s) in {text:?}", sentences.len());
        }

        let Some((last, confirmed)) = sentences.split_last() else {
            return;
        };
        if confirmed.is_empty() {
            return;
        }

        let confirmed_len: usize = confirmed.iter().map(|s| s.chars().count()).sum();
        if confirmed_len < self.config.min_sentence_length {
            return;
        }

        let min_emit = self.config.min_sentence_length / 2;
        let mut carried = String::new();
        let mut ready = Vec::new();
        for sentence in confirmed {
            if sentence.chars().count() >= min_emit {
                if carried.is_empty() {
                    ready.push(sentence.clone());
                } else {
                    ready.push(format!("{} {}", std::mem::take(&mut carried), sentence.trim()));
                }
            } else {
                if !carried.is_empty() {
                    carried.push(' ');
                }
                carried.push_str(sentence.trim());
            }
        }

        let rest = if carried.is_empty() {
            last.clone()
        } else {
            format!("{carried} {}", last.trim_start())
        };

        self.stats.emission_events += 1;
        let overflow = self.buffer.reset_after_confirmation(&rest, &self.config);
        if self.config.quick_yield_all_sentences {
            self.phase = EmissionPhase::AwaitingFirstFragment;
        }

        for sentence in &ready {
            self.emit(sentence, FragmentKind::Confirmed, emit);
        }
        for forced in &overflow {
            self.stats.forced_splits += 1;
            self.emit(forced, FragmentKind::Forced, emit);
        }
    }

    fn segment(&mut self, text: &str) -> Segmentation {
        self.stats.tokenizer_calls += 1;
        let segmentation = self.tokenizer.segment(text);
        if segmentation.is_degraded() {
            self.stats.degraded_calls += 1;
        }
        segmentation
    }

    fn emit(&mut self, raw: &str, kind: FragmentKind, emit: &mut impl FnMut(Fragment)) {
        let text = clean_text(raw, self.config.cleanup_text_emojis);
        if text.is_empty() {
            return;
        }

        if self.config.debug {
            log::debug!("Yielding {kind} fragment #{}: {text:?}", self.emitted);
        }

        let fragment = Fragment::new(text, kind, self.emitted);
        self.emitted += 1;
        self.stats.fragments_emitted += 1;
        emit(fragment);
    }

    pub fn phase(&self) -> EmissionPhase {
        self.phase
    }

    /// Characters currently buffered
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &SegmentBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> SegmenterStats {
        self.stats
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &TokenizerAdapter {
        &self.tokenizer
    }
}
