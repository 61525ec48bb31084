use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;

pub(super) type TokenQueue = VecDeque<String>;

/// Shortest `[...]` run on a single line.
static EFFECT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]").unwrap_or_else(|err| panic!("invalid effect marker pattern: {err}"))
});

/// Split chapter prose into an ordered queue of words and atomic effect markers.
///
/// An unterminated `[` is not a marker; its fragment is split like any other text.
pub(super) fn tokenize(content: &str) -> TokenQueue {
    let content = content.trim();
    let mut tokens = TokenQueue::new();
    let mut cursor = 0;

    for marker in EFFECT_MARKER.find_iter(content) {
        push_part(&content[cursor..marker.start()], &mut tokens);
        tokens.push_back(marker.as_str().to_string());
        cursor = marker.end();
    }
    push_part(&content[cursor..], &mut tokens);

    tokens
}

fn push_part(part: &str, tokens: &mut TokenQueue) {
    if part.is_empty() {
        return;
    }
    // A bracketed run spanning a line break is still kept whole
    if part.starts_with('[') && part.ends_with(']') {
        tokens.push_back(part.trim().to_string());
        return;
    }
    tokens.extend(part.split_whitespace().map(str::to_string));
}

/// Words left once every effect marker is removed
pub(super) fn spoken_word_count(text: &str) -> usize {
    EFFECT_MARKER
        .replace_all(text, " ")
        .split_whitespace()
        .count()
}
