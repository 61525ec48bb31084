use super::markers::{extract_markers, spoken_words, strip_markers};
use super::SegmenterConfig;

/// Text, effects and timing of one finished utterance, before attribution
#[derive(Debug, Clone, PartialEq)]
pub(super) struct UtteranceDraft {
    pub(super) text: String,
    pub(super) sfx: String,
    pub(super) duration: f64,
}

/// Greedy sentence accumulator for a single speaker turn
pub(super) struct UtteranceAccumulator<'cfg> {
    config: &'cfg SegmenterConfig,
    buffer: String,
    drafts: Vec<UtteranceDraft>,
}

impl<'cfg> UtteranceAccumulator<'cfg> {
    pub(super) fn new(config: &'cfg SegmenterConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            drafts: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, fragment: &str) {
        let candidate = if self.buffer.is_empty() {
            fragment.to_string()
        } else {
            format!("{} {}", self.buffer, fragment).trim().to_string()
        };

        // Split before the fragment that would push the buffer past the ceiling
        let projected = spoken_words(&candidate) as f64 / self.config.words_per_second;
        if projected > self.config.max_chunk_seconds && !self.buffer.is_empty() {
            self.finish_buffer();
            self.buffer = fragment.trim().to_string();
        } else {
            self.buffer = candidate;
        }
    }

    pub(super) fn finish(mut self) -> Vec<UtteranceDraft> {
        if !self.buffer.is_empty() {
            self.finish_buffer();
        }
        self.drafts
    }

    fn finish_buffer(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        let markers = extract_markers(&buffer);
        let words = spoken_words(&buffer);
        let duration = if words == 0 && !markers.is_empty() {
            self.config.effect_only_seconds
        } else {
            round2(self.config.min_seconds.max(words as f64 / self.config.words_per_second))
        };
        self.drafts.push(UtteranceDraft {
            text: strip_markers(&buffer),
            sfx: markers.join(" "),
            duration,
        });
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drafts(fragments: &[&str]) -> Vec<UtteranceDraft> {
        let config = SegmenterConfig::default();
        let mut accumulator = UtteranceAccumulator::new(&config);
        for fragment in fragments {
            accumulator.push(fragment);
        }
        accumulator.finish()
    }

    #[test]
    fn short_fragments_merge() {
        let result = drafts(&["One two. ", "Three four five."]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "One two. Three four five.");
        assert_eq!(result[0].duration, 2.0);
    }

    #[test]
    fn splits_past_ceiling() {
        let sentence = format!("{}. ", vec!["word"; 30].join(" "));
        let result = drafts(&[sentence.as_str(), sentence.as_str()]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].duration, 12.0);
        assert_eq!(result[1].duration, 12.0);
    }

    #[test]
    fn oversized_single_fragment_is_not_split() {
        let sentence = vec!["word"; 60].join(" ");
        let result = drafts(&[sentence.as_str()]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].duration, 24.0);
    }

    #[test]
    fn floor_applies_to_short_text() {
        let result = drafts(&["Go."]);
        assert_eq!(result[0].duration, 1.0);
    }

    #[test]
    fn effect_only_buffer_gets_default_duration() {
        let result = drafts(&["[sfx:gunshot]"]);
        assert_eq!(result[0].text, "");
        assert_eq!(result[0].sfx, "[sfx:gunshot]");
        assert_eq!(result[0].duration, 1.5);
    }

    #[test]
    fn effect_only_buffer_split_before_long_sentence() {
        let sentence = format!("{}.", vec!["word"; 60].join(" "));
        let result = drafts(&["[sfx:boom] ", sentence.as_str()]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "");
        assert_eq!(result[0].sfx, "[sfx:boom]");
        assert_eq!(result[0].duration, 1.5);
        assert_eq!(result[1].duration, 24.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(7.0 / 2.5), 2.8);
        assert_eq!(round2(1.23456), 1.23);
    }

    #[test]
    fn markers_do_not_count_as_words() {
        let result = drafts(&["[sfx:rain] [sfx:wind] Cold. "]);
        assert_eq!(result[0].sfx, "[sfx:rain] [sfx:wind]");
        assert_eq!(result[0].text, "Cold.");
        assert_eq!(result[0].duration, 1.0);
    }
}
