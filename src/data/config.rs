// ============================================================
// Layer 4 — Segment Pipeline Configuration
// ============================================================
// The numeric knobs of the segmentation pipeline:
//
//   block_size          tokens per block (B)
//   history_n_segments  history blocks kept before the target (H)
//   noise_n_segments    noise blocks spliced into every sample (N)
//   batch_size          samples per emitted batch
//   max_samples         cap on documents consumed per pass
//   shuffle             shuffle the document order once per pass
//   seed                seed for shuffling and noise draws
//
// validate() must pass before any pipeline component is built.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub block_size:         usize,
    pub history_n_segments: usize,
    pub noise_n_segments:   usize,
    pub batch_size:         usize,
    pub max_samples:        Option<usize>,
    pub shuffle:            bool,
    pub seed:               u64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            block_size:         512,
            history_n_segments: 0,
            noise_n_segments:   1,
            batch_size:         8,
            max_samples:        None,
            shuffle:            false,
            seed:               42,
        }
    }
}

impl SegmentConfig {
    /// Fail fast on parameters the pipeline cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.block_size == 0 {
            return Err(PipelineError::config("block_size must be positive"));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::config("batch_size must be positive"));
        }
        if self.max_samples == Some(0) {
            return Err(PipelineError::config(
                "max_samples must be positive when set",
            ));
        }
        Ok(())
    }

    /// Maximum number of blocks a sample can hold after noise injection.
    pub fn max_blocks_per_sample(&self) -> usize {
        self.history_n_segments + 1 + self.noise_n_segments
    }

    /// Upper bound on the collated sequence length.
    pub fn max_tokens_per_sample(&self) -> usize {
        self.max_blocks_per_sample() * self.block_size
    }
}
