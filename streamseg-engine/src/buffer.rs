//! Streaming buffer manager
//!
//! Owns the pending characters and every counter derived from them. Counters
//! only change through the `push` step or one of the `reset_after_*` methods,
//! so a buffer mutation can never leave stale counters behind.

use crate::config::SegmenterConfig;
use streamseg_core::DelimiterClass;

/// Characters that survive the leading filter on an empty buffer
const LEADING_ALLOWED: [char; 5] = ['(', '[', '\u{ab}', '"', '\''];

/// Outcome of pushing one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Append {
    /// Dropped by the leading filter; no counter changed
    Filtered,
    /// Counted, and appended unless it was leading whitespace
    Appended,
    /// The cap was exceeded; carries the raw text split off the front
    Overflow(String),
}

/// Pending text plus its counters
#[derive(Debug, Clone, Default)]
pub struct SegmentBuffer {
    chars: Vec<char>,
    word_count: usize,
    last_strong_delimiter_pos: Option<usize>,
    chars_since_last_strong_delimiter: usize,
    tokenization_counter: usize,
    fragment_count: usize,
}

impl SegmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one classified character
    pub fn push(&mut self, ch: char, class: DelimiterClass, config: &SegmenterConfig) -> Append {
        if self.chars.is_empty()
            && config.filter_leading_non_alnum
            && !ch.is_alphanumeric()
            && !LEADING_ALLOWED.contains(&ch)
        {
            return Append::Filtered;
        }

        if !(self.chars.is_empty() && ch.is_whitespace()) {
            self.chars.push(ch);
        }

        if ch.is_whitespace() || class.is_fragment_delimiter() {
            self.word_count += 1;
        }
        match class {
            DelimiterClass::Strong => self.chars_since_last_strong_delimiter = 0,
            DelimiterClass::Ignored => {}
            _ => self.chars_since_last_strong_delimiter += 1,
        }

        if self.chars.len() > config.max_buffer_size {
            return Append::Overflow(self.reset_after_overflow(config));
        }
        Append::Appended
    }

    fn reset_after_overflow(&mut self, config: &SegmenterConfig) -> String {
        let cut = (config.max_buffer_size / 2).min(self.chars.len());
        let forced: String = self.chars.drain(..cut).collect();
        self.strip_leading_whitespace();

        self.word_count = self
            .word_count
            .saturating_sub(config.forced_split_word_correction);
        self.tokenization_counter = 0;
        self.chars_since_last_strong_delimiter = 0;
        self.last_strong_delimiter_pos = None;
        forced
    }

    /// Clear after a fast-path emission
    pub fn reset_after_emit(&mut self) {
        self.chars.clear();
        self.word_count = 0;
        self.last_strong_delimiter_pos = None;
        self.chars_since_last_strong_delimiter = 0;
        self.tokenization_counter = 0;
        self.fragment_count += 1;
    }

    /// Replace the buffer with the unconfirmed tail of a tokenizer result
    ///
    /// A trailing space on the old buffer is preserved. Returns the pieces
    /// split off the front until the replacement fits under the cap.
    pub fn reset_after_confirmation(
        &mut self,
        rest: &str,
        config: &SegmenterConfig,
    ) -> Vec<String> {
        let ends_with_space = self.ends_with_space();
        self.chars.clear();
        self.chars.extend(rest.chars());
        self.strip_leading_whitespace();
        if ends_with_space && !self.chars.is_empty() {
            self.chars.push(' ');
        }

        self.last_strong_delimiter_pos = None;
        self.word_count = 0;
        self.chars_since_last_strong_delimiter = 0;
        self.fragment_count += 1;

        let mut forced = Vec::new();
        while self.chars.len() > config.max_buffer_size {
            forced.push(self.reset_after_overflow(config));
        }
        forced
    }

    /// Remember that the last character is a strong delimiter
    pub fn mark_strong_delimiter(&mut self) {
        self.last_strong_delimiter_pos = self.chars.len().checked_sub(1);
    }

    /// Count one throttled lookback candidate and return the new count
    pub fn bump_tokenization_counter(&mut self) -> usize {
        self.tokenization_counter += 1;
        self.tokenization_counter
    }

    pub fn reset_tokenization_counter(&mut self) {
        self.tokenization_counter = 0;
    }

    /// Drain everything, leaving counters untouched
    pub fn take_remainder(&mut self) -> String {
        self.chars.drain(..).collect()
    }

    fn strip_leading_whitespace(&mut self) {
        let lead = self
            .chars
            .iter()
            .take_while(|c| c.is_whitespace())
            .count();
        self.chars.drain(..lead);
    }

    pub fn ends_with_space(&self) -> bool {
        self.chars.last() == Some(&' ')
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn last(&self) -> Option<char> {
        self.chars.last().copied()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// Length without surrounding whitespace
    pub fn trimmed_len(&self) -> usize {
        let lead = self.chars.iter().take_while(|c| c.is_whitespace()).count();
        let trail = self
            .chars
            .iter()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count();
        self.chars.len().saturating_sub(lead + trail)
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn last_strong_delimiter_pos(&self) -> Option<usize> {
        self.last_strong_delimiter_pos
    }

    pub fn chars_since_last_strong_delimiter(&self) -> usize {
        self.chars_since_last_strong_delimiter
    }

    pub fn tokenization_counter(&self) -> usize {
        self.tokenization_counter
    }

    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }
}
