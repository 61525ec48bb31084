use once_cell::sync::Lazy;
use regex::Regex;

pub const NARRATOR: &str = "Narrator";

/// `NAME:` at the start of a turn, possibly after leading effect markers.
/// Labels are case sensitive: only uppercase letters (accented included), digits and blanks.
static LEADING_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:\[[^\]\n]*\]\s*)*)(\p{Lu}[\p{Lu}\p{Nd} \t]+):\s*(.*)$")
        .unwrap_or_else(|err| panic!("invalid speaker label pattern: {err}"))
});

/// A label that opens a new turn mid-line, right after a finished sentence.
/// The colon must end the word, so clock times like `AT 10:30` stay in the sentence.
static INLINE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]["'”’)]*\s+((?:\[[^\]\n]*\]\s*)*\p{Lu}[\p{Lu}\p{Nd} \t]+:)(?:\s|$)"#)
        .unwrap_or_else(|err| panic!("invalid inline label pattern: {err}"))
});

/// One speaker's stretch of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Turn {
    pub(super) speaker: String,
    pub(super) text: String,
}

/// Split a line at every inline speaker label and attribute each piece
pub(super) fn split_turns(line: &str) -> Vec<Turn> {
    let mut starts = vec![0];
    starts.extend(
        INLINE_LABEL
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).map(|label| label.start())),
    );
    starts.push(line.len());

    starts
        .windows(2)
        .map(|bounds| attribute(&line[bounds[0]..bounds[1]]))
        .collect()
}

fn attribute(piece: &str) -> Turn {
    let piece = piece.trim();
    match LEADING_LABEL.captures(piece) {
        Some(caps) => {
            let lead = caps[1].trim();
            let rest = caps[3].trim();
            let text = match (lead.is_empty(), rest.is_empty()) {
                (true, _) => rest.to_string(),
                (false, true) => lead.to_string(),
                (false, false) => format!("{lead} {rest}"),
            };
            Turn {
                speaker: caps[2].trim().to_string(),
                text,
            }
        }
        None => Turn {
            speaker: NARRATOR.to_string(),
            text: piece.to_string(),
        },
    }
}
