// ============================================================
// Layer 4 — Noise Corpus and Noise Injector
// ============================================================
// Noise blocks come from an unrelated corpus and are spliced
// into each sample so the model learns to carry its memory
// across irrelevant segments.
//
// Preparing the noise corpus (group_into_blocks):
//   all token streams are concatenated and cut into block_size
//   chunks starting at 0, B, 2B, ... while start < total - B.
//   Each chunk becomes one single-block noise document.
//
// Injecting (NoiseInjector::inject), for a sample of L blocks:
//   1. draw N positions uniformly from 0..L (with replacement)
//   2. for each position in draw order: pick a random noise
//      document and insert its ids at that position
//
// Positions come from 0..L, not 0..=L, so a noise block can
// never land after the last (target) block. Inserting at the
// same position twice puts the later draw in front:
//
//   [T]  --insert n1 @0-->  [n1, T]  --insert n2 @0-->  [n2, n1, T]
//
// Real blocks are never removed or replaced: the result always
// has L + N blocks with the originals in their original order.

use rand::Rng;

use crate::domain::document::TokenizedDocument;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::sample::Sample;
use crate::domain::traits::Corpus;

/// Concatenate `documents` and cut the stream into `block_size` chunks.
pub fn group_into_blocks(
    documents:  &[TokenizedDocument],
    block_size: usize,
) -> Vec<TokenizedDocument> {
    if block_size == 0 {
        return Vec::new();
    }

    let total: usize = documents.iter().map(TokenizedDocument::len).sum();
    let mut ids  = Vec::with_capacity(total);
    let mut mask = Vec::with_capacity(total);
    for doc in documents {
        ids.extend_from_slice(&doc.input_ids);
        mask.extend_from_slice(&doc.attention_mask);
    }

    let end = total.saturating_sub(block_size);
    (0..end)
        .step_by(block_size)
        .map(|start| TokenizedDocument {
            input_ids:      ids[start..start + block_size].to_vec(),
            attention_mask: mask[start..start + block_size].to_vec(),
        })
        .collect()
}

/// Splices noise blocks drawn from `noise` into samples.
pub struct NoiseInjector<'a, C: Corpus + ?Sized> {
    noise:            &'a C,
    noise_n_segments: usize,
}

impl<'a, C: Corpus + ?Sized> NoiseInjector<'a, C> {
    /// Fails if noise is requested but the noise corpus is empty.
    pub fn new(noise: &'a C, noise_n_segments: usize) -> PipelineResult<Self> {
        if noise_n_segments > 0 && noise.is_empty() {
            return Err(PipelineError::config(format!(
                "noise_n_segments = {noise_n_segments} but the noise corpus is empty"
            )));
        }
        Ok(Self { noise, noise_n_segments })
    }

    /// Insert `noise_n_segments` noise blocks into `sample`.
    ///
    /// Returns the drawn insertion positions in draw order.
    /// An empty sample has no valid position and is left untouched.
    pub fn inject<R: Rng + ?Sized>(
        &self,
        sample: &mut Sample,
        rng:    &mut R,
    ) -> PipelineResult<Vec<usize>> {
        let len = sample.blocks.len();
        if self.noise_n_segments == 0 || len == 0 {
            return Ok(Vec::new());
        }

        let positions: Vec<usize> = (0..self.noise_n_segments)
            .map(|_| rng.gen_range(0..len))
            .collect();

        for &p in &positions {
            let pick  = rng.gen_range(0..self.noise.len());
            let block = self.noise.document(pick)?.input_ids.clone();
            sample.blocks.insert(p, block);
        }

        Ok(positions)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::TokenCorpus;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn noise_corpus() -> TokenCorpus {
        // Noise ids live in the 1000s so they are easy to tell apart
        TokenCorpus::new(
            (0..5)
                .map(|d| TokenizedDocument::from_ids(vec![1000 + d; 4]))
                .collect(),
        )
    }

    fn is_noise(block: &[u32]) -> bool {
        block.iter().all(|&t| t >= 1000)
    }

    #[test]
    fn test_grouping_drops_final_chunk() {
        let docs = vec![
            TokenizedDocument::from_ids((0..5).collect()),
            TokenizedDocument::from_ids((5..12).collect()),
        ];
        // 12 tokens, B = 4 → starts 0 and 4 only
        let grouped = group_into_blocks(&docs, 4);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].input_ids, vec![0, 1, 2, 3]);
        assert_eq!(grouped[1].input_ids, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_grouping_short_stream_is_empty() {
        let docs = vec![TokenizedDocument::from_ids(vec![1, 2, 3])];
        assert!(group_into_blocks(&docs, 4).is_empty());
        assert!(group_into_blocks(&docs, 0).is_empty());
    }

    #[test]
    fn test_single_block_sample_gets_noise_in_front() {
        let noise    = noise_corpus();
        let injector = NoiseInjector::new(&noise, 2).unwrap();
        let mut rng  = StdRng::seed_from_u64(7);

        let target     = vec![1, 2, 3, 4];
        let mut sample = Sample::new(vec![target.clone()]);
        let positions  = injector.inject(&mut sample, &mut rng).unwrap();

        assert_eq!(positions, vec![0, 0]);
        assert_eq!(sample.num_blocks(), 3);
        assert!(is_noise(&sample.blocks[0]));
        assert!(is_noise(&sample.blocks[1]));
        assert_eq!(sample.blocks[2], target);
    }

    #[test]
    fn test_repeated_position_puts_later_draw_first() {
        // Documented behaviour: the second insertion at index 0
        // pushes the first noise block one place to the right.
        struct Sequential(Vec<TokenizedDocument>);
        impl Corpus for Sequential {
            fn len(&self) -> usize { self.0.len() }
            fn document(&self, index: usize) -> PipelineResult<&TokenizedDocument> {
                self.0.get(index).ok_or(PipelineError::CorpusAccess { index, len: self.0.len() })
            }
        }

        let noise    = Sequential(vec![TokenizedDocument::from_ids(vec![1000; 4])]);
        let injector = NoiseInjector::new(&noise, 2).unwrap();
        let mut rng  = StdRng::seed_from_u64(0);

        let mut sample = Sample::new(vec![vec![1; 4]]);
        injector.inject(&mut sample, &mut rng).unwrap();
        assert_eq!(sample.blocks, vec![vec![1000; 4], vec![1000; 4], vec![1; 4]]);
    }

    #[test]
    fn test_target_block_stays_last() {
        let noise    = noise_corpus();
        let injector = NoiseInjector::new(&noise, 3).unwrap();
        let mut rng  = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let mut sample = Sample::new(vec![vec![1; 4], vec![2; 4], vec![3; 4]]);
            injector.inject(&mut sample, &mut rng).unwrap();
            // Noise is drawn from 0..len, never len itself
            assert_eq!(sample.blocks.last(), Some(&vec![3; 4]));
        }
    }

    #[test]
    fn test_zero_noise_is_noop() {
        let noise    = TokenCorpus::default();
        let injector = NoiseInjector::new(&noise, 0).unwrap();
        let mut rng  = StdRng::seed_from_u64(1);

        let mut sample = Sample::new(vec![vec![1; 4]]);
        assert!(injector.inject(&mut sample, &mut rng).unwrap().is_empty());
        assert_eq!(sample.num_blocks(), 1);
    }

    #[test]
    fn test_empty_noise_corpus_rejected() {
        let noise = TokenCorpus::default();
        assert!(matches!(
            NoiseInjector::new(&noise, 1),
            Err(PipelineError::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_noise_is_purely_additive(
            num_blocks in 1usize..6,
            n in 0usize..5,
            seed in any::<u64>(),
        ) {
            let noise    = noise_corpus();
            let injector = NoiseInjector::new(&noise, n).unwrap();
            let mut rng  = StdRng::seed_from_u64(seed);

            let original: Vec<Vec<u32>> =
                (0..num_blocks as u32).map(|b| vec![b; 4]).collect();
            let mut sample = Sample::new(original.clone());
            injector.inject(&mut sample, &mut rng).unwrap();

            prop_assert_eq!(sample.num_blocks(), num_blocks + n);

            // Originals survive as an ordered subsequence
            let kept: Vec<Vec<u32>> = sample
                .blocks
                .iter()
                .filter(|b| !is_noise(b))
                .cloned()
                .collect();
            prop_assert_eq!(kept, original);
        }
    }
}
