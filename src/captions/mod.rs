//! Caption timing synthesis - turns chapter prose into time-coded SRT blocks
//!
//! Pure function module: chapters in, caption track out. Timing is derived
//! from word counts only, so the same input always yields the same track.

mod clock;
pub mod srt;
mod tokens;


use tracing::debug;

use crate::types::{CaptionTrack, Chapter, Language};

use clock::CaptionClock;
use tokens::{spoken_word_count, tokenize, TokenQueue};

pub use srt::format_timestamp;

/// Timing policy for caption synthesis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionTiming {
    pub words_per_second: f64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    /// Duration of a chunk that carries only effect markers
    pub effect_only_duration_ms: u64,
    pub title_duration_ms: u64,
    pub line_pause_ms: u64,
    pub chapter_pause_ms: u64,
    pub initial_offset_ms: u64,
    /// Measured in characters
    pub max_line_length: usize,
    pub lines_per_chunk: usize,
}

impl Default for CaptionTiming {
    fn default() -> Self {
        Self {
            words_per_second: 2.5,
            min_duration_ms: 3000,
            max_duration_ms: 7000,
            effect_only_duration_ms: 2000,
            title_duration_ms: 3000,
            line_pause_ms: 400,
            chapter_pause_ms: 2000,
            initial_offset_ms: 1000,
            max_line_length: 45,
            lines_per_chunk: 2,
        }
    }
}

impl CaptionTiming {
    /// Display time for a body chunk with `word_count` spoken words
    pub fn body_duration_ms(&self, word_count: usize) -> u64 {
        if word_count == 0 {
            return self.effect_only_duration_ms;
        }
        let estimated = (word_count as f64 / self.words_per_second * 1000.0).round() as u64;
        estimated.clamp(self.min_duration_ms, self.max_duration_ms)
    }
}

/// Build the caption track for `chapters` with the default timing policy
pub fn synthesize(chapters: &[Chapter], language: Language) -> CaptionTrack {
    synthesize_with(chapters, language, &CaptionTiming::default())
}

/// Build the caption track for `chapters` with an explicit timing policy
///
/// Every chapter opens with a fixed-length title caption, then its body is
/// packed greedily into chunks of up to `lines_per_chunk` lines.
pub fn synthesize_with(
    chapters: &[Chapter],
    language: Language,
    timing: &CaptionTiming,
) -> CaptionTrack {
    let mut clock = CaptionClock::new(timing);

    for (index, chapter) in chapters.iter().enumerate() {
        let title = format!(
            "{} {}: {}",
            language.chapter_word(),
            index + 1,
            chapter.title
        );
        clock.emit(title, timing.title_duration_ms);

        let mut tokens = tokenize(&chapter.content);
        while !tokens.is_empty() {
            let text = next_chunk_text(&mut tokens, timing);
            // Unreachable while every line takes at least one token
            if text.trim().is_empty() {
                continue;
            }
            let duration = timing.body_duration_ms(spoken_word_count(&text));
            clock.emit(text, duration);
        }

        clock.chapter_break();
    }

    let track = clock.into_track();
    debug!(
        chapters = chapters.len(),
        chunks = track.chunks.len(),
        "synthesized caption track"
    );
    track
}

fn next_chunk_text(tokens: &mut TokenQueue, timing: &CaptionTiming) -> String {
    let mut lines = Vec::with_capacity(timing.lines_per_chunk);
    for _ in 0..timing.lines_per_chunk {
        if tokens.is_empty() {
            break;
        }
        let line = take_line(tokens, timing.max_line_length);
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Greedily consume tokens while the line stays within `max_len` characters.
/// The first token of a line is always taken, however long it is.
fn take_line(tokens: &mut TokenQueue, max_len: usize) -> String {
    let mut line = String::new();
    let mut line_len = 0;
    while let Some(next) = tokens.front() {
        let next_len = next.chars().count();
        if !line.is_empty() && line_len + 1 + next_len > max_len {
            break;
        }
        if !line.is_empty() {
            line.push(' ');
            line_len += 1;
        }
        line.push_str(next);
        line_len += next_len;
        tokens.pop_front();
    }
    line
}
