// ============================================================
// Layer 3 — Blocks, Samples and Batches
// ============================================================
// A Block is a fixed-length run of token ids cut from one
// document (or from the noise corpus). A Sample is an ordered
// list of blocks: history blocks, any spliced-in noise blocks,
// and finally the target block the window ends at.
//
// Example with block_size = 4, one history block, one noise block:
//
//   Sample { blocks: [ [1 2 3 4], [n n n n], [5 6 7 8] ] }
//                        history     noise     target
//
// Samples are transient: built per window, collated, dropped.

use serde::{Deserialize, Serialize};

/// A contiguous run of token ids.
pub type Block = Vec<u32>;

/// One training instance before flattening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub blocks: Vec<Block>,
}

impl Sample {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of tokens across all blocks.
    pub fn num_tokens(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// All blocks concatenated in order.
    pub fn flatten(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.num_tokens());
        for block in &self.blocks {
            out.extend_from_slice(block);
        }
        out
    }
}

/// A group of exactly `batch_size` samples headed for one collation.
pub type Batch = Vec<Sample>;
