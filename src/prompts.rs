//! Image-prompt batching boundary
//!
//! Caption chunks are projected to `{id, text}` items and grouped into
//! independent requests for the prompt-writing collaborator. Answers come
//! back per batch in any order and are joined again on `id`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::CaptionChunk;

pub const DEFAULT_BATCH_SIZE: usize = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("batch size must be greater than zero")]
    EmptyBatchSize,
}

/// One caption handed to the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptItem {
    pub id: u32,
    pub text: String,
}

impl From<&CaptionChunk> for PromptItem {
    fn from(chunk: &CaptionChunk) -> Self {
        Self {
            id: chunk.id,
            text: chunk.text.clone(),
        }
    }
}

/// One prompt returned by the collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub id: u32,
    pub prompt: String,
}

/// Wire shape of a collaborator answer: `{"prompts": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct PromptBatchResponse {
    pub prompts: Vec<ImagePrompt>,
}

/// Group caption chunks into consecutive batches of at most `batch_size` items
pub fn batch_payload(
    chunks: &[CaptionChunk],
    batch_size: usize,
) -> Result<Vec<Vec<PromptItem>>, PromptError> {
    if batch_size == 0 {
        return Err(PromptError::EmptyBatchSize);
    }
    Ok(chunks
        .chunks(batch_size)
        .map(|batch| batch.iter().map(PromptItem::from).collect())
        .collect())
}

/// Flatten per-batch answers and order them by caption id.
/// When an id is answered twice the first answer wins.
pub fn merge_prompt_batches<I>(batches: I) -> Vec<ImagePrompt>
where
    I: IntoIterator<Item = Vec<ImagePrompt>>,
{
    let mut by_id: BTreeMap<u32, ImagePrompt> = BTreeMap::new();
    for prompt in batches.into_iter().flatten() {
        by_id.entry(prompt.id).or_insert(prompt);
    }
    by_id.into_values().collect()
}
