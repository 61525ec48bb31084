//! Core types for the chaptercast export pipeline

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One generated chapter of a script, as returned by the writing collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    /// Narrative body; may carry `[effect]` markers and `NAME:` speaker prefixes
    pub content: String,
    #[serde(default)]
    pub main_emotion: String,
    #[serde(default)]
    pub emotion_tag: String,
    #[serde(default)]
    pub key_event: String,
    #[serde(default)]
    pub ending_hook: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_emotion(mut self, main_emotion: &str, emotion_tag: &str) -> Self {
        self.main_emotion = main_emotion.to_string();
        self.emotion_tag = emotion_tag.to_string();
        self
    }

    /// Label attached to every record derived from this chapter.
    /// The English tag wins over the free-form emotion when both are present.
    pub fn emotion(&self) -> &str {
        if self.emotion_tag.is_empty() {
            &self.main_emotion
        } else {
            &self.emotion_tag
        }
    }
}

/// Output language; only affects literal labels, never timing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Vi,
    En,
}

impl Language {
    pub fn chapter_word(self) -> &'static str {
        match self {
            Language::Vi => "Chương",
            Language::En => "Chapter",
        }
    }
}

/// A time-coded caption block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionChunk {
    /// 1-based, dense across the whole run
    pub id: u32,
    /// One or two newline-joined lines
    pub text: String,
    pub start_time: u64, // milliseconds
    pub end_time: u64,   // milliseconds
}

impl CaptionChunk {
    pub fn duration_ms(&self) -> u64 {
        self.end_time - self.start_time
    }
}

/// Rendered caption file plus the chunks it was built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTrack {
    pub srt: String,
    pub chunks: Vec<CaptionChunk>,
}

/// A speaker-attributed unit of spoken text for audio pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredUtterance {
    /// 1-based chapter number
    pub chapter: u32,
    pub speaker: String,
    pub text: String,
    /// Space-joined effect markers found in the utterance
    pub sfx: String,
    pub emotion: String,
    /// Estimated speaking time in seconds, rounded to 2 decimals
    pub duration: f64,
}

/// Optional document metadata used by the text and Fountain renderers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptMeta {
    pub title: String,
    pub genre: String,
    pub style: String,
    pub total_chapters: String,
    pub language: Language,
    pub outline: Option<String>,
}

/// Chapter documents accepted on input: a bare array or `{"chapters": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChapterDocument {
    List(Vec<Chapter>),
    Wrapped { chapters: Vec<Chapter> },
}

impl ChapterDocument {
    pub fn into_chapters(self) -> Vec<Chapter> {
        match self {
            ChapterDocument::List(chapters) => chapters,
            ChapterDocument::Wrapped { chapters } => chapters,
        }
    }
}
