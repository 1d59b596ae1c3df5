//! Delimiter classification
//!
//! Every character the segmenter sees is mapped to exactly one
//! [`DelimiterClass`]. The sets are configurable; when a character appears
//! in more than one set the precedence is Strong > Weak > Ignored.

use crate::error::{CoreError, Result};
use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default delimiter sets
pub mod defaults {
    /// Full sentence terminators
    pub const STRONG: &str = ".!?\n\u{2026}\u{3002}";
    /// Short internal pauses
    pub const WEAK: &str = ",;:\u{2014}";
    /// Quotes, brackets, carriage return and plain space
    pub const IGNORED: &str = "\"'()[]{}\u{ab}\u{bb}\r ";
    /// Weak delimiters accepted at the lookback position
    pub const LOOKBACK_WEAK: &str = ";:,";
}

/// Role of a single character in boundary detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelimiterClass {
    /// Ends a sentence
    Strong,
    /// Marks a short internal pause
    Weak,
    /// Skipped when looking for candidates
    Ignored,
    /// Ordinary content
    None,
}

impl DelimiterClass {
    /// Strong or weak
    pub fn is_fragment_delimiter(self) -> bool {
        matches!(self, DelimiterClass::Strong | DelimiterClass::Weak)
    }
}

impl fmt::Display for DelimiterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DelimiterClass::Strong => "strong",
            DelimiterClass::Weak => "weak",
            DelimiterClass::Ignored => "ignored",
            DelimiterClass::None => "none",
        };
        f.write_str(name)
    }
}

/// Character sets driving classification
///
/// Each set is stored as a string whose characters are the members, which
/// keeps the TOML form readable (`strong = ".!?"`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DelimiterSets {
    /// Strong delimiters
    pub strong: String,
    /// Weak delimiters
    pub weak: String,
    /// Ignored characters
    pub ignored: String,
    /// Weak delimiters that qualify as a lookback candidate
    pub lookback_weak: String,
}

impl Default for DelimiterSets {
    fn default() -> Self {
        Self {
            strong: defaults::STRONG.to_string(),
            weak: defaults::WEAK.to_string(),
            ignored: defaults::IGNORED.to_string(),
            lookback_weak: defaults::LOOKBACK_WEAK.to_string(),
        }
    }
}

impl DelimiterSets {
    /// Report the first character that belongs to more than one class set
    ///
    /// Overlap is not fatal for classification, which applies precedence.
    pub fn check_disjoint(&self) -> Result<()> {
        let pairs = [
            (&self.strong, DelimiterClass::Strong, &self.weak, DelimiterClass::Weak),
            (&self.strong, DelimiterClass::Strong, &self.ignored, DelimiterClass::Ignored),
            (&self.weak, DelimiterClass::Weak, &self.ignored, DelimiterClass::Ignored),
        ];

        for (winner, first, loser, second) in pairs {
            if let Some(ch) = winner.chars().find(|c| loser.contains(*c)) {
                return Err(CoreError::OverlappingDelimiter { ch, first, second });
            }
        }
        Ok(())
    }
}

/// Total character classifier built from [`DelimiterSets`]
#[derive(Debug, Clone)]
pub struct DelimiterClassifier {
    strong: HashSet<char>,
    weak: HashSet<char>,
    ignored: HashSet<char>,
    lookback_weak: HashSet<char>,
}

impl Default for DelimiterClassifier {
    fn default() -> Self {
        Self::new(&DelimiterSets::default())
    }
}

impl DelimiterClassifier {
    /// Build a classifier from the given sets
    pub fn new(sets: &DelimiterSets) -> Self {
        Self {
            strong: sets.strong.chars().collect(),
            weak: sets.weak.chars().collect(),
            ignored: sets.ignored.chars().collect(),
            lookback_weak: sets.lookback_weak.chars().collect(),
        }
    }

    /// Classify a character
    pub fn classify(&self, ch: char) -> DelimiterClass {
        if self.strong.contains(&ch) {
            DelimiterClass::Strong
        } else if self.weak.contains(&ch) {
            DelimiterClass::Weak
        } else if self.ignored.contains(&ch) {
            DelimiterClass::Ignored
        } else {
            DelimiterClass::None
        }
    }

    /// Strong delimiter
    #[inline]
    pub fn is_strong(&self, ch: char) -> bool {
        self.classify(ch) == DelimiterClass::Strong
    }

    /// Weak delimiter
    #[inline]
    pub fn is_weak(&self, ch: char) -> bool {
        self.classify(ch) == DelimiterClass::Weak
    }

    /// Ignored character
    #[inline]
    pub fn is_ignored(&self, ch: char) -> bool {
        self.classify(ch) == DelimiterClass::Ignored
    }

    /// Strong or weak delimiter
    #[inline]
    pub fn is_fragment_delimiter(&self, ch: char) -> bool {
        self.classify(ch).is_fragment_delimiter()
    }

    /// Membership in the lookback weak set, independent of [`classify`](Self::classify)
    #[inline]
    pub fn is_lookback_weak(&self, ch: char) -> bool {
        self.lookback_weak.contains(&ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classes() {
        let c = DelimiterClassifier::default();
        for ch in ['.', '!', '?', '\n', '\u{2026}', '\u{3002}'] {
            assert_eq!(c.classify(ch), DelimiterClass::Strong, "{ch:?}");
        }
        for ch in [',', ';', ':', '\u{2014}'] {
            assert_eq!(c.classify(ch), DelimiterClass::Weak, "{ch:?}");
        }
        for ch in ['"', '\'', '(', ')', '[', ']', '{', '}', '\u{ab}', '\u{bb}', '\r', ' '] {
            assert_eq!(c.classify(ch), DelimiterClass::Ignored, "{ch:?}");
        }
        for ch in ['a', 'Z', '7', 'ж', '-', '\t'] {
            assert_eq!(c.classify(ch), DelimiterClass::None, "{ch:?}");
        }
    }

    #[test]
    fn test_precedence_on_overlap() {
        let sets = DelimiterSets {
            strong: ".,".to_string(),
            weak: ",;".to_string(),
            ignored: ";, ".to_string(),
            ..Default::default()
        };
        let c = DelimiterClassifier::new(&sets);
        assert_eq!(c.classify(','), DelimiterClass::Strong);
        assert_eq!(c.classify(';'), DelimiterClass::Weak);
        assert_eq!(c.classify(' '), DelimiterClass::Ignored);
    }

    #[test]
    fn test_check_disjoint() {
        assert!(DelimiterSets::default().check_disjoint().is_ok());

        let sets = DelimiterSets {
            weak: ",;:\u{2014} ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            sets.check_disjoint(),
            Err(CoreError::OverlappingDelimiter {
                ch: ' ',
                first: DelimiterClass::Weak,
                second: DelimiterClass::Ignored,
            })
        );
    }

    #[test]
    fn test_lookback_weak_is_separate_from_weak() {
        let c = DelimiterClassifier::default();
        assert!(c.is_lookback_weak(','));
        assert!(c.is_weak('\u{2014}'));
        assert!(!c.is_lookback_weak('\u{2014}'));
    }

    #[test]
    fn test_fragment_delimiter_helpers() {
        let c = DelimiterClassifier::default();
        assert!(c.is_fragment_delimiter('.'));
        assert!(c.is_fragment_delimiter(','));
        assert!(!c.is_fragment_delimiter(' '));
        assert!(!c.is_fragment_delimiter('x'));
        assert!(c.is_strong('!') && c.is_ignored('"'));
    }
}
