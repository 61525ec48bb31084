//! File renderers for every export format
//!
//! Renderers are pure: they return the document as a string and leave
//! writing to the caller.

pub mod fountain;
pub mod text;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::captions;
use crate::dialogue;
use crate::types::{Chapter, Language, StructuredUtterance};

pub use fountain::render_fountain;
pub use text::render_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Json,
    Srt,
    Fountain,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Srt => "srt",
            ExportFormat::Fountain => "fountain",
        }
    }
}

/// File name stem derived from a script title; `"script"` when nothing usable remains
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "script".to_string()
    } else {
        stem
    }
}

pub fn render_srt(chapters: &[Chapter], language: Language) -> String {
    captions::synthesize(chapters, language).srt
}

/// Pretty-printed structured utterance list (2-space indent)
pub fn render_structured(chapters: &[Chapter]) -> Result<String> {
    let utterances: Vec<StructuredUtterance> = dialogue::segment(chapters);
    serde_json::to_string_pretty(&utterances).context("Failed to serialize structured script")
}
