// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace tokenizer.json and resolves the special
// ids the collator needs.
//
//   pad id → padding params if configured, else the first known
//            pad token found in the vocabulary (may be absent)
//   eos id → the first known end-of-sequence token; a tokenizer
//            without one is a configuration error
//
// Reference: tokenizers crate documentation

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::error::PipelineError;
use crate::domain::traits::{SpecialTokens, TextEncoder};

const PAD_TOKENS: &[&str] = &["[PAD]", "<pad>", "<|pad|>"];
const EOS_TOKENS: &[&str] = &["</s>", "<|endoftext|>", "<eos>", "[SEP]"];

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    /// `path` is either a tokenizer.json file or a directory holding one.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = if path.is_dir() { path.join("tokenizer.json") } else { path };
        Self { path }
    }

    pub fn load(&self) -> Result<HfTokenizer> {
        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", self.path.display(), e)
        })?;
        let tok = HfTokenizer::new(tokenizer)
            .with_context(|| format!("Tokenizer '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded tokenizer '{}' (pad={:?}, eos={})",
            self.path.display(),
            tok.pad_id,
            tok.eos_id
        );
        Ok(tok)
    }
}

/// A loaded tokenizer with its special ids resolved.
pub struct HfTokenizer {
    inner:  Tokenizer,
    pad_id: Option<u32>,
    eos_id: u32,
}

impl HfTokenizer {
    pub fn new(inner: Tokenizer) -> Result<Self, PipelineError> {
        let pad_id = inner
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| PAD_TOKENS.iter().find_map(|t| inner.token_to_id(t)));

        let eos_id = EOS_TOKENS
            .iter()
            .find_map(|t| inner.token_to_id(t))
            .ok_or_else(|| {
                PipelineError::config(format!(
                    "tokenizer defines none of the end-of-sequence tokens {EOS_TOKENS:?}"
                ))
            })?;

        Ok(Self { inner, pad_id, eos_id })
    }

    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, false)
            .map_err(|e| anyhow::anyhow!("Decoding error: {e}"))
    }
}

impl TextEncoder for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }
}

impl SpecialTokens for HfTokenizer {
    fn pad_id(&self) -> Option<u32> {
        self.pad_id
    }

    fn eos_id(&self) -> u32 {
        self.eos_id
    }
}
