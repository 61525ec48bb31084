//! Structured dialogue segmentation - speaker-attributed utterances for audio export
//!
//! Chapter text is normalized, split into lines and speaker turns, then
//! sentences are packed into utterances no longer than a duration ceiling.
//! Output order (chapter, line, turn, split) doubles as playback order.

mod accumulator;
mod fragments;
mod markers;
mod speaker;


use tracing::debug;

use crate::types::{Chapter, StructuredUtterance};

use accumulator::UtteranceAccumulator;
use fragments::split_fragments;
use markers::normalize_markers;
use speaker::split_turns;

pub use speaker::NARRATOR;

/// Pacing policy for the segmenter, tuned independently of caption timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterConfig {
    pub words_per_second: f64,
    /// Projected duration above which a new utterance is started
    pub max_chunk_seconds: f64,
    pub min_seconds: f64,
    /// Duration of an utterance that carries effects but no words
    pub effect_only_seconds: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            words_per_second: 2.5,
            max_chunk_seconds: 20.0,
            min_seconds: 1.0,
            effect_only_seconds: 1.5,
        }
    }
}

/// Segment `chapters` with the default pacing policy
pub fn segment(chapters: &[Chapter]) -> Vec<StructuredUtterance> {
    segment_with(chapters, &SegmenterConfig::default())
}

pub fn segment_with(chapters: &[Chapter], config: &SegmenterConfig) -> Vec<StructuredUtterance> {
    let mut utterances = Vec::new();

    for (index, chapter) in chapters.iter().enumerate() {
        let chapter_number = index as u32 + 1;
        let emotion = chapter.emotion();
        let content = normalize_markers(&chapter.content);

        for line in content.split('\n').filter(|line| !line.trim().is_empty()) {
            for turn in split_turns(line) {
                if turn.text.is_empty() {
                    continue;
                }
                let mut accumulator = UtteranceAccumulator::new(config);
                for fragment in split_fragments(&turn.text) {
                    accumulator.push(fragment);
                }
                utterances.extend(accumulator.finish().into_iter().map(|draft| {
                    StructuredUtterance {
                        chapter: chapter_number,
                        speaker: turn.speaker.clone(),
                        text: draft.text,
                        sfx: draft.sfx,
                        emotion: emotion.to_string(),
                        duration: draft.duration,
                    }
                }));
            }
        }
    }

    debug!(
        chapters = chapters.len(),
        utterances = utterances.len(),
        "segmented structured dialogue"
    );
    utterances
}
