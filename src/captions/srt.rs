//! SubRip rendering helpers

/// Format milliseconds as `HH:MM:SS,mmm`.
///
/// Hours are zero padded to two digits but never truncated.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let rest = ms % 3_600_000;
    let minutes = rest / 60_000;
    let rest = rest % 60_000;
    let seconds = rest / 1000;
    let millis = rest % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Append one `{index}\n{start} --> {end}\n{text}\n\n` record
pub(super) fn write_block(out: &mut String, id: u32, start_ms: u64, end_ms: u64, text: &str) {
    out.push_str(&id.to_string());
    out.push('\n');
    out.push_str(&format_timestamp(start_ms));
    out.push_str(" --> ");
    out.push_str(&format_timestamp(end_ms));
    out.push('\n');
    out.push_str(text);
    out.push_str("\n\n");
}
