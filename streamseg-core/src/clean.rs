//! Text cleaning applied to every emitted fragment

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static EMOJI_PATTERN: OnceLock<Regex> = OnceLock::new();

fn emoji_pattern() -> &'static Regex {
    EMOJI_PATTERN.get_or_init(|| {
        Regex::new(
            r"[\p{Extended_Pictographic}\u{1F3FB}-\u{1F3FF}\u{1F1E6}-\u{1F1FF}\u{FE0F}\u{200D}\u{20E3}\u{E0020}-\u{E007F}]",
        )
        .expect("emoji pattern is valid")
    })
}

/// Remove emoji, skin tone modifiers, flags and joiners
pub fn strip_emojis(text: &str) -> Cow<'_, str> {
    emoji_pattern().replace_all(text, "")
}

/// Prepare a fragment for emission: optionally drop emoji, then trim
pub fn clean_text(text: &str, strip_emoji: bool) -> String {
    if strip_emoji {
        strip_emojis(text).trim().to_string()
    } else {
        text.trim().to_string()
    }
}
