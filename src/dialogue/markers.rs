use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid marker pattern {pattern}: {err}"))
}

static SOUND_PREFIX: Lazy<Regex> = Lazy::new(|| compile(r"\[sound:"));
static PAUSE_ASSIGN: Lazy<Regex> = Lazy::new(|| compile(r"\[pause=([\d.]+)\]"));
/// Marker with no `:` or `=` argument, e.g. `[gunshot]`
static BARE_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\[\]:=\n]+)\]"));

static EFFECT_MARKER: Lazy<Regex> = Lazy::new(|| compile(r"\[[^\]\n]*\]"));

/// Rewrite alternate marker spellings into `[sfx:name]` / `[pause:Ns]`
pub(super) fn normalize_markers(content: &str) -> String {
    let content = SOUND_PREFIX.replace_all(content, "[sfx:");
    let content = PAUSE_ASSIGN.replace_all(&content, "[pause:${1}s]");
    BARE_MARKER
        .replace_all(&content, |caps: &Captures| {
            let name = caps[1].trim();
            if name.is_empty() {
                caps[0].to_string()
            } else {
                format!("[sfx:{name}]")
            }
        })
        .into_owned()
}

/// Every marker in `text`, in order
pub(super) fn extract_markers(text: &str) -> Vec<&str> {
    EFFECT_MARKER.find_iter(text).map(|m| m.as_str()).collect()
}

/// `text` without markers, whitespace collapsed to single spaces
pub(super) fn strip_markers(text: &str) -> String {
    let stripped: Cow<'_, str> = EFFECT_MARKER.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(super) fn spoken_words(text: &str) -> usize {
    EFFECT_MARKER.replace_all(text, " ").split_whitespace().count()
}
