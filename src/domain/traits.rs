// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the pipeline and its collaborators:
//
//   DocumentSource → anything that loads documents from storage
//   Corpus         → read-only indexed access to loaded documents
//   TextEncoder    → text to token ids
//   SpecialTokens  → the pad / end-of-sequence ids of a tokenizer
//
// The segmenter, noise injector and batch assembler only see
// these traits, so tests can drive them with in-memory corpora
// and fixed token ids.

use anyhow::Result;

use crate::domain::document::TokenizedDocument;
use crate::domain::error::PipelineResult;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load a full corpus from a source.
///
/// Implementations:
///   - JsonlCorpusLoader → directory of tokenized `.jsonl` files
///   - TextCorpusLoader  → directory of `.txt` / `.docx` files, tokenized on load
pub trait DocumentSource {
    fn load_all(&self) -> Result<Vec<TokenizedDocument>>;
}

// ─── Corpus ───────────────────────────────────────────────────────────────────
/// Read-only indexed document storage.
///
/// Shared by reference across worker threads, hence `Sync`.
pub trait Corpus: Sync {
    /// Number of documents.
    fn len(&self) -> usize;

    /// Borrow the document at `index`.
    ///
    /// Out-of-range access returns `PipelineError::CorpusAccess`.
    fn document(&self, index: usize) -> PipelineResult<&TokenizedDocument>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// Maps raw text to token ids. The tokenizer itself is a black box.
pub trait TextEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>>;
}

// ─── SpecialTokens ────────────────────────────────────────────────────────────
/// The tokenizer ids the collator needs for padding.
pub trait SpecialTokens {
    /// Padding id, if the tokenizer defines one.
    fn pad_id(&self) -> Option<u32>;

    /// End-of-sequence id.
    fn eos_id(&self) -> u32;

    /// The id used to pad `input_ids`: pad if present, otherwise eos.
    fn pad_or_eos(&self) -> u32 {
        self.pad_id().unwrap_or_else(|| self.eos_id())
    }
}

/// Plain special-token ids, for pre-tokenized runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSpecialTokens {
    pub pad_id: Option<u32>,
    pub eos_id: u32,
}

impl FixedSpecialTokens {
    pub fn new(pad_id: Option<u32>, eos_id: u32) -> Self {
        Self { pad_id, eos_id }
    }
}

impl SpecialTokens for FixedSpecialTokens {
    fn pad_id(&self) -> Option<u32> {
        self.pad_id
    }

    fn eos_id(&self) -> u32 {
        self.eos_id
    }
}
