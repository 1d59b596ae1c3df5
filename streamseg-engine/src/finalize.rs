//! End-of-input draining

/// Group the tokenized remainder into fragments of at least `min_len` chars
///
/// Sentences are accumulated, space-separated, until the accumulation
/// reaches `min_len`; whatever is left at the end forms the last group.
pub fn join_for_emission(sentences: &[String], min_len: usize) -> Vec<String> {
    let mut groups = Vec::new();
    let mut pending = String::new();

    for sentence in sentences {
        pending.push_str(sentence);
        if pending.chars().count() < min_len {
            pending.push(' ');
            continue;
        }
        groups.push(std::mem::take(&mut pending));
    }

    if !pending.trim().is_empty() {
        groups.push(pending);
    }
    groups
}
