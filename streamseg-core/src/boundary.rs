//! Boundary heuristic
//!
//! Cheap filter evaluated on a lookback candidate before the batch tokenizer
//! is consulted. It only ever rejects commas that follow a very short clause
//! and periods that look like part of an abbreviation or a number.

/// Minimum trimmed text before a comma
const MIN_TEXT_BEFORE_COMMA: usize = 4;

/// Tokens of this length or shorter do not close a clause at a comma
const MAX_SHORT_TOKEN: usize = 3;

/// Letter runs of this length or shorter may be an abbreviation
const MAX_ABBREVIATION_RUN: usize = 2;

/// Whether the delimiter at `position` plausibly ends a sentence
///
/// `text` is the buffered text as characters. Positions outside the text and
/// position 0 are never boundaries.
pub fn is_likely_boundary(text: &[char], position: usize) -> bool {
    if position < 1 || position >= text.len() {
        return false;
    }

    match text[position] {
        ',' => comma_closes_clause(&text[..position]),
        '.' => !period_inside_token(text, position),
        _ => true,
    }
}

fn comma_closes_clause(before: &[char]) -> bool {
    let start = before
        .iter()
        .position(|c| !c.is_whitespace())
        .unwrap_or(before.len());
    let end = before
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map_or(start, |i| i + 1);
    let trimmed = &before[start..end];

    if trimmed.len() < MIN_TEXT_BEFORE_COMMA {
        return false;
    }

    let last_token = trimmed
        .rsplit(|c| c.is_whitespace())
        .next()
        .unwrap_or(trimmed);
    last_token.len() > MAX_SHORT_TOKEN
}

fn period_inside_token(text: &[char], position: usize) -> bool {
    let run = text[..position]
        .iter()
        .rev()
        .take_while(|c| c.is_alphabetic() || **c == '-' || **c == '_')
        .count();

    let continues = text
        .get(position + 1)
        .is_some_and(|c| c.is_alphanumeric() || *c == '.');

    run <= MAX_ABBREVIATION_RUN && continues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn find(text: &[char], ch: char) -> usize {
        text.iter().position(|c| *c == ch).unwrap()
    }

    #[test]
    fn test_position_bounds() {
        let text = chars(". abc");
        assert!(!is_likely_boundary(&text, 0));
        assert!(!is_likely_boundary(&text, text.len()));
        assert!(!is_likely_boundary(&text, 100));
        assert!(!is_likely_boundary(&[], 0));
    }

    #[test]
    fn test_comma_after_short_prefix() {
        let text = chars("Mr, он пошёл домой.");
        assert!(!is_likely_boundary(&text, 2));
    }

    #[test]
    fn test_comma_after_short_token() {
        let text = chars("We went to the zoo, and then home");
        assert!(!is_likely_boundary(&text, find(&text, ',')));
    }

    #[test]
    fn test_comma_after_long_token() {
        let text = chars("We went to the market, and then home");
        assert!(is_likely_boundary(&text, find(&text, ',')));
    }

    #[test]
    fn test_period_in_abbreviation() {
        let text = chars("т.е.");
        assert!(!is_likely_boundary(&text, 1));

        let text = chars("см.. далее");
        assert!(!is_likely_boundary(&text, 2));
    }

    #[test]
    fn test_period_before_space_is_boundary() {
        let text = chars("Go to the U.S. now");
        // "S" followed by a space: short run but nothing glued after it
        assert!(is_likely_boundary(&text, 13));
        // "U" followed by "S"
        assert!(!is_likely_boundary(&text, 11));
    }

    #[test]
    fn test_decimal_number() {
        let text = chars("It costs 3.50 today");
        // digits are not letters, so the run is empty and the next char is a digit
        assert!(!is_likely_boundary(&text, find(&text, '.')));
    }

    #[test]
    fn test_period_after_long_word() {
        let text = chars("It was raining.And then");
        assert!(is_likely_boundary(&text, find(&text, '.')));
    }

    #[test]
    fn test_other_delimiters_accepted() {
        let text = chars("Really? Yes! Fine; ok");
        assert!(is_likely_boundary(&text, find(&text, '?')));
        assert!(is_likely_boundary(&text, find(&text, '!')));
        assert!(is_likely_boundary(&text, find(&text, ';')));
    }
}
