// ============================================================
// Layer 4 — Segmenter
// ============================================================
// Cuts a document into fixed-size blocks and describes the
// history windows that end at each block boundary.
//
// Blocks: num_blocks = floor(len / block_size). A trailing
// remainder shorter than block_size is dropped, so every block
// has exactly block_size tokens.
//
// Windows: one per boundary i = 1 .. num_blocks - 1, covering
// blocks [max(0, i - H - 1), i). Boundary 0 has nothing before
// it and is skipped.
//
// Example with block_size = 4, H = 1, ids = 1..=12:
//   blocks:  [1-4] [5-8] [9-12]
//   i = 1 →  [1-4]
//   i = 2 →  [1-4] [5-8]
//
// No randomness here; the same document always yields the same
// windows.

use std::ops::Range;

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::sample::Sample;

/// Descriptor of one sample window: the half-open range of block
/// indices it covers. `blocks.end` is the boundary it ends at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub blocks: Range<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    block_size:         usize,
    history_n_segments: usize,
}

impl Segmenter {
    /// Fails with a configuration error if `block_size` is zero.
    pub fn new(block_size: usize, history_n_segments: usize) -> PipelineResult<Self> {
        if block_size == 0 {
            return Err(PipelineError::config("block_size must be positive"));
        }
        Ok(Self { block_size, history_n_segments })
    }

    /// Number of full blocks in a sequence of `num_tokens` tokens.
    pub fn num_blocks(&self, num_tokens: usize) -> usize {
        num_tokens / self.block_size
    }

    /// Lazily yield the windows for a document of `num_tokens` tokens.
    pub fn windows(&self, num_tokens: usize) -> impl Iterator<Item = Window> {
        let num_blocks = self.num_blocks(num_tokens);
        let history    = self.history_n_segments;

        (1..num_blocks).map(move |i| Window {
            blocks: i.saturating_sub(history + 1)..i,
        })
    }

    /// The token slice of block `index`.
    pub fn block<'a>(&self, ids: &'a [u32], index: usize) -> &'a [u32] {
        let start = index * self.block_size;
        &ids[start..start + self.block_size]
    }

    /// Copy the blocks a window covers into a fresh sample.
    pub fn materialise(&self, ids: &[u32], window: &Window) -> Sample {
        let blocks = window
            .blocks
            .clone()
            .map(|b| self.block(ids, b).to_vec())
            .collect();
        Sample::new(blocks)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    fn segmenter(block_size: usize, history: usize) -> Segmenter {
        Segmenter::new(block_size, history).unwrap()
    }

    /// All samples of one document, in increasing boundary order.
    fn samples(seg: &Segmenter, ids: &[u32]) -> Vec<Sample> {
        seg.windows(ids.len()).map(|w| seg.materialise(ids, &w)).collect()
    }

    #[test]
    fn test_twelve_tokens_history_one() {
        let seg     = segmenter(4, 1);
        let samples = samples(&seg, &ids(12));

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].blocks, vec![vec![1, 2, 3, 4]]);
        assert_eq!(
            samples[1].blocks,
            vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]
        );
    }

    #[test]
    fn test_history_window_slides() {
        let seg     = segmenter(2, 1);
        let windows: Vec<_> = seg.windows(10).collect();

        // 5 blocks → boundaries 1..=4
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].blocks, 0..1);
        assert_eq!(windows[1].blocks, 0..2);
        assert_eq!(windows[2].blocks, 1..3);
        assert_eq!(windows[3].blocks, 2..4);
    }

    #[test]
    fn test_zero_history_keeps_single_block() {
        let seg = segmenter(3, 0);
        for (i, w) in seg.windows(30).enumerate() {
            assert_eq!(w.blocks, i..i + 1);
        }
    }

    #[test]
    fn test_trailing_remainder_is_dropped() {
        let seg     = segmenter(4, 5);
        let samples = samples(&seg, &ids(15));

        // 15 tokens → 3 full blocks, token 13..15 never appear
        assert_eq!(samples.len(), 2);
        for s in &samples {
            assert!(s.flatten().iter().all(|&t| t <= 12));
            assert!(s.blocks.iter().all(|b| b.len() == 4));
        }
    }

    #[test]
    fn test_short_documents_yield_nothing() {
        let seg = segmenter(4, 1);
        assert_eq!(seg.windows(0).count(), 0);
        assert_eq!(seg.windows(3).count(), 0);
        assert_eq!(seg.windows(7).count(), 0);
        assert_eq!(seg.windows(8).count(), 1);
    }

    #[test]
    fn test_zero_block_size_is_config_error() {
        assert!(matches!(Segmenter::new(0, 1), Err(PipelineError::Config(_))));
    }

    proptest! {
        #[test]
        fn prop_window_count_and_lengths(
            len in 0usize..400,
            block_size in 1usize..16,
            history in 0usize..6,
        ) {
            let seg        = segmenter(block_size, history);
            let num_blocks = len / block_size;
            let windows: Vec<_> = seg.windows(len).collect();

            prop_assert_eq!(windows.len(), num_blocks.saturating_sub(1));
            for (i, w) in windows.iter().enumerate() {
                let boundary = i + 1;
                prop_assert_eq!(w.blocks.end, boundary);
                prop_assert_eq!(w.blocks.len(), boundary.min(history + 1));
                prop_assert!(w.blocks.end <= num_blocks);
            }
        }

        #[test]
        fn prop_windows_are_deterministic(
            len in 0usize..200,
            block_size in 1usize..8,
            history in 0usize..4,
        ) {
            let seg = segmenter(block_size, history);
            let a: Vec<_> = seg.windows(len).collect();
            let b: Vec<_> = seg.windows(len).collect();
            prop_assert_eq!(a, b);
        }
    }
}
