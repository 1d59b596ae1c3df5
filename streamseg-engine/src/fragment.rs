//! Emitted sentence fragments

use std::fmt;

/// Which path produced a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Fast path before any tokenizer confirmation
    FirstFragment,
    /// Confirmed by the tokenizer mid-stream
    Confirmed,
    /// Split off because the buffer hit its cap
    Forced,
    /// Drained at end of input
    Final,
}

impl FragmentKind {
    /// Lowercase name used in output formats
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::FirstFragment => "first",
            FragmentKind::Confirmed => "confirmed",
            FragmentKind::Forced => "forced",
            FragmentKind::Final => "final",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned, non-empty unit of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    kind: FragmentKind,
    index: usize,
}

impl Fragment {
    /// Build a fragment; the segmenter only ever passes cleaned, non-empty text
    pub fn new(text: String, kind: FragmentKind, index: usize) -> Self {
        Self { text, kind, index }
    }

    /// Cleaned text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Production path
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Zero-based position in the stream's output
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Take the text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<Fragment> for String {
    fn from(fragment: Fragment) -> Self {
        fragment.text
    }
}

/// Emit callback that collects fragments into a vector
pub fn emit_push(fragments: &mut Vec<Fragment>) -> impl FnMut(Fragment) + '_ {
    move |fragment| fragments.push(fragment)
}

/// Counters describing one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmenterStats {
    /// Fragments handed to the consumer
    pub fragments_emitted: usize,
    /// Buffer clears and replacements (first, confirmed, forced)
    pub emission_events: usize,
    /// Tokenizer invocations
    pub tokenizer_calls: usize,
    /// Invocations that fell back to passthrough
    pub degraded_calls: usize,
    /// Forced splits
    pub forced_splits: usize,
    /// Characters fed to the segmenter
    pub chars_consumed: usize,
}
