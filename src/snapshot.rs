//! Parsing of streamed collaborator responses
//!
//! The collaborator emits growing text snapshots before its final answer.
//! Every intermediate snapshot is parsed optimistically; only the final text
//! has to parse.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("final response is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Strip a surrounding ```` ```json ```` fence and surrounding whitespace
pub fn strip_json_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("```json").unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed)
}

/// Parse a response body, returning `None` when it is not (yet) valid
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_str(strip_json_fence(text)).ok()
}

/// Keeps the most recent successfully parsed snapshot
#[derive(Debug)]
pub struct SnapshotParser<T> {
    latest: Option<T>,
    observed: usize,
}

impl<T> Default for SnapshotParser<T> {
    fn default() -> Self {
        Self {
            latest: None,
            observed: 0,
        }
    }
}

impl<T: DeserializeOwned> SnapshotParser<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-parse a partial snapshot; failures are expected and ignored
    pub fn observe(&mut self, snapshot: &str) -> Option<&T> {
        self.observed += 1;
        match parse_json_response(snapshot) {
            Some(value) => self.latest = Some(value),
            None => debug!(
                snapshot = self.observed,
                len = snapshot.len(),
                "partial snapshot not parseable yet"
            ),
        }
        self.latest.as_ref()
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    /// Parse the final response; unlike snapshots it must be valid
    pub fn finish(self, final_text: &str) -> Result<T, SnapshotError> {
        Ok(serde_json::from_str(strip_json_fence(final_text))?)
    }
}
