// ============================================================
// Layer 3 — Pipeline Error Type
// ============================================================
// Typed failures raised by the segmentation pipeline.
//
//   Config          → invalid numeric parameters, raised before
//                     any iteration starts
//   CorpusAccess    → an index list pointed past the end of a
//                     corpus (a bug in index construction)
//   MalformedDocument → ids and mask disagree on length at load
//
// Running out of documents is NOT an error: the batch iterator
// simply returns None.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("corpus index {index} out of range for corpus of {len} documents")]
    CorpusAccess { index: usize, len: usize },

    #[error("malformed document at {source_name}:{line}: {reason}")]
    MalformedDocument {
        source_name: String,
        line:        usize,
        reason:      String,
    },
}

impl PipelineError {
    /// Shorthand for building a `Config` error from anything printable.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
