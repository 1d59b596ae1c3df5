//! Rule-based sentence model
//!
//! Splits text after terminator runs that are followed by whitespace or the
//! end of the text, unless the token before the period is a known
//! abbreviation or an initial, or the next word starts in lowercase.

use crate::language::LanguagePack;
use std::collections::HashSet;

/// Sentence splitter built from a [`LanguagePack`]
#[derive(Debug, Clone)]
pub struct SentenceModel {
    code: String,
    terminators: HashSet<char>,
    closing: HashSet<char>,
    abbreviations: HashSet<String>,
    newline_boundary: bool,
    initials_are_abbreviations: bool,
    lowercase_continues: bool,
}

impl SentenceModel {
    pub fn from_pack(pack: &LanguagePack) -> Self {
        Self {
            code: pack.metadata.code.clone(),
            terminators: pack.terminators.chars.iter().copied().collect(),
            closing: pack.closing.chars.iter().copied().collect(),
            abbreviations: pack.abbreviation_list().collect(),
            newline_boundary: pack.terminators.newline_is_boundary,
            initials_are_abbreviations: pack.rules.initials_are_abbreviations,
            lowercase_continues: pack.rules.lowercase_continues,
        }
    }

    /// Language code of the pack this model was built from
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Split `text` into trimmed, non-empty sentences
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (offset, ch) = chars[i];

            if ch == '\n' && self.newline_boundary {
                push_trimmed(&mut sentences, &text[start..offset]);
                start = offset + ch.len_utf8();
                i += 1;
                continue;
            }

            if !self.terminators.contains(&ch) {
                i += 1;
                continue;
            }

            let mut end = i + 1;
            while end < chars.len()
                && (self.terminators.contains(&chars[end].1) || self.closing.contains(&chars[end].1))
            {
                end += 1;
            }

            let at_end = end == chars.len();
            let before_space = !at_end && chars[end].1.is_whitespace();
            if (at_end || before_space) && !self.suppressed(&chars, i, end) {
                let cut = if at_end { text.len() } else { chars[end].0 };
                push_trimmed(&mut sentences, &text[start..cut]);
                start = cut;
            }
            i = end;
        }

        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }

    fn suppressed(&self, chars: &[(usize, char)], terminator: usize, run_end: usize) -> bool {
        if chars[terminator].1 == '.' {
            let token: String = chars[..terminator]
                .iter()
                .rev()
                .map(|(_, c)| *c)
                .take_while(|c| c.is_alphanumeric() || *c == '.')
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let token = token.trim_matches('.');

            if !token.is_empty() && self.abbreviations.contains(&token.to_lowercase()) {
                return true;
            }

            let mut letters = token.chars();
            if self.initials_are_abbreviations {
                if let (Some(first), None) = (letters.next(), letters.next()) {
                    if first.is_uppercase() {
                        return true;
                    }
                }
            }
        }

        if self.lowercase_continues {
            let next = chars[run_end..]
                .iter()
                .map(|(_, c)| *c)
                .find(|c| !c.is_whitespace());
            if next.is_some_and(|c| c.is_lowercase()) {
                return true;
            }
        }

        false
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
