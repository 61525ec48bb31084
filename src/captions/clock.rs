use crate::types::{CaptionChunk, CaptionTrack};

use super::srt::write_block;
use super::CaptionTiming;

/// Running clock and id counter shared by every chunk of a track
pub(super) struct CaptionClock {
    now_ms: u64,
    next_id: u32,
    line_pause_ms: u64,
    chapter_pause_ms: u64,
    track: CaptionTrack,
}

impl CaptionClock {
    pub(super) fn new(timing: &CaptionTiming) -> Self {
        Self {
            now_ms: timing.initial_offset_ms,
            next_id: 1,
            line_pause_ms: timing.line_pause_ms,
            chapter_pause_ms: timing.chapter_pause_ms,
            track: CaptionTrack::default(),
        }
    }

    /// Place `text` at the current time and advance past it plus the line pause
    pub(super) fn emit(&mut self, text: String, duration_ms: u64) {
        let start_time = self.now_ms;
        let end_time = start_time + duration_ms;
        write_block(&mut self.track.srt, self.next_id, start_time, end_time, &text);
        self.track.chunks.push(CaptionChunk {
            id: self.next_id,
            text,
            start_time,
            end_time,
        });
        self.next_id += 1;
        self.now_ms = end_time + self.line_pause_ms;
    }

    pub(super) fn chapter_break(&mut self) {
        self.now_ms += self.chapter_pause_ms;
    }

    pub(super) fn into_track(self) -> CaptionTrack {
        self.track
    }
}
