use once_cell::sync::Lazy;
use regex::Regex;

/// Non-terminator run (markers are atomic, a lone `[` is plain text), then
/// any terminators and trailing whitespace.
static SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\[[^\]\n]*\]|[^.!?\[]|\[)+[.!?]*\s*")
        .unwrap_or_else(|err| panic!("invalid sentence pattern: {err}"))
});

/// Sentence-like pieces of `text`; the whole text when nothing matches
pub(super) fn split_fragments(text: &str) -> Vec<&str> {
    let fragments: Vec<&str> = SENTENCE.find_iter(text).map(|m| m.as_str()).collect();
    if fragments.is_empty() {
        vec![text]
    } else {
        fragments
    }
}
