// ============================================================
// Layer 3 — Tokenized Document
// ============================================================
// One tokenized text record: the token ids plus the parallel
// attention mask produced by the tokenizer.
//
// Documents are loaded once and never mutated; the pipeline
// only ever reads them through the Corpus trait.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

/// A tokenized document as stored on disk (one JSONL line).
///
/// Invariant: `input_ids.len() == attention_mask.len()`.
/// Loaders enforce it with [`TokenizedDocument::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedDocument {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
}

impl TokenizedDocument {
    /// A document whose mask is all ones, which is what the
    /// tokenizer produces for unpadded text.
    pub fn from_ids(input_ids: Vec<u32>) -> Self {
        let attention_mask = vec![1; input_ids.len()];
        Self { input_ids, attention_mask }
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Validate the ids/mask invariant, reporting `source_name:line` on failure.
    pub fn check(&self, source_name: &str, line: usize) -> PipelineResult<()> {
        if self.input_ids.len() != self.attention_mask.len() {
            return Err(PipelineError::MalformedDocument {
                source_name: source_name.to_string(),
                line,
                reason: format!(
                    "input_ids has {} tokens but attention_mask has {}",
                    self.input_ids.len(),
                    self.attention_mask.len()
                ),
            });
        }
        Ok(())
    }
}
