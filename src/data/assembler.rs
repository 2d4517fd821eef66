// ============================================================
// Layer 4 — Batch Assembler
// ============================================================
// Pulls documents one at a time, expands each into samples
// (segmenter + noise injector) and hands out batches of exactly
// batch_size samples.
//
// A document yields a number of samples that is unknown until it
// is segmented, so samples are kept in a FIFO carry buffer that
// spans document boundaries:
//
//   docs:    [ d0: 2 samples ][ d1: 3 samples ][ d2: 1 sample ]
//   batch_size = 2
//   batches: (d0 d0) (d1 d1) (d1 d2)
//
// The pass ends when the index list is used up. Full batches are
// still drained from the buffer; a short remainder is dropped and
// never emitted.
//
// Ordering: the index list is cut to max_samples, then shuffled
// once if configured. Documents are read in that order and
// windows in increasing boundary order. The assembler owns its
// RNG, so a pass is reproducible from the seed alone.

use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::collator::{CollatedBatch, Collator};
use crate::data::config::SegmentConfig;
use crate::data::noise::NoiseInjector;
use crate::data::segmenter::Segmenter;
use crate::domain::error::PipelineResult;
use crate::domain::sample::{Batch, Sample};
use crate::domain::traits::Corpus;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub documents: usize,
    pub samples:   usize,
    pub batches:   usize,
    pub discarded: usize,
}

pub struct BatchAssembler<'a, C: Corpus + ?Sized, N: Corpus + ?Sized> {
    corpus:     &'a C,
    segmenter:  Segmenter,
    injector:   NoiseInjector<'a, N>,
    batch_size: usize,
    order:      Vec<usize>,
    cursor:     usize,
    buffer:     VecDeque<Sample>,
    rng:        StdRng,
    exhausted:  bool,
    stats:      AssemblerStats,
}

impl<'a, C: Corpus + ?Sized, N: Corpus + ?Sized> BatchAssembler<'a, C, N> {
    /// Build an assembler whose RNG is seeded from `config.seed`.
    ///
    /// `indices` are positions into `corpus`, usually one rank's
    /// or one worker's shard.
    pub fn new(
        corpus:  &'a C,
        noise:   &'a N,
        config:  &SegmentConfig,
        indices: Vec<usize>,
    ) -> PipelineResult<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_rng(corpus, noise, config, indices, rng)
    }

    /// Build an assembler around an explicit RNG.
    pub fn with_rng(
        corpus:      &'a C,
        noise:       &'a N,
        config:      &SegmentConfig,
        mut indices: Vec<usize>,
        mut rng:     StdRng,
    ) -> PipelineResult<Self> {
        config.validate()?;
        let injector = NoiseInjector::new(noise, config.noise_n_segments)?;

        if let Some(max) = config.max_samples {
            indices.truncate(max);
        }
        if config.shuffle {
            indices.shuffle(&mut rng);
        }

        tracing::debug!(
            "Assembler ready: {} documents, batch_size={}, block_size={}, H={}, N={}",
            indices.len(),
            config.batch_size,
            config.block_size,
            config.history_n_segments,
            config.noise_n_segments,
        );

        Ok(Self {
            corpus,
            segmenter: Segmenter::new(config.block_size, config.history_n_segments)?,
            injector,
            batch_size: config.batch_size,
            order: indices,
            cursor: 0,
            buffer: VecDeque::new(),
            rng,
            exhausted: false,
            stats: AssemblerStats::default(),
        })
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    /// Document order for this pass, after truncation and shuffling.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Collate every batch as it is produced.
    pub fn collated(
        self,
        collator: Collator,
    ) -> impl Iterator<Item = PipelineResult<CollatedBatch>> + 'a
    where
        C: 'a,
        N: 'a,
    {
        self.map(move |batch| batch.map(|b| collator.collate(&b)))
    }

    /// Expand the next document into the buffer.
    /// Returns false once the index list is used up.
    fn pull_document(&mut self) -> PipelineResult<bool> {
        let Some(&index) = self.order.get(self.cursor) else {
            return Ok(false);
        };
        self.cursor += 1;

        let corpus = self.corpus;
        let doc    = corpus.document(index)?;

        for window in self.segmenter.windows(doc.len()) {
            let mut sample = self.segmenter.materialise(&doc.input_ids, &window);
            self.injector.inject(&mut sample, &mut self.rng)?;
            self.buffer.push_back(sample);
            self.stats.samples += 1;
        }
        self.stats.documents += 1;
        Ok(true)
    }

    fn finish(&mut self) {
        self.exhausted = true;
        if !self.buffer.is_empty() {
            tracing::debug!(
                "Dropping {} leftover samples (< batch_size {})",
                self.buffer.len(),
                self.batch_size
            );
            self.stats.discarded += self.buffer.len();
            self.buffer.clear();
        }
    }
}

impl<'a, C: Corpus + ?Sized, N: Corpus + ?Sized> Iterator for BatchAssembler<'a, C, N> {
    type Item = PipelineResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.buffer.len() >= self.batch_size {
                let batch: Batch = self.buffer.drain(..self.batch_size).collect();
                self.stats.batches += 1;
                return Some(Ok(batch));
            }
            if self.exhausted {
                return None;
            }
            match self.pull_document() {
                Ok(true) => {}
                Ok(false) => self.finish(),
                Err(e) => {
                    self.finish();
                    return Some(Err(e));
                }
            }
        }
    }
}
