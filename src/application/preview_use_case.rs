// ============================================================
// Layer 2 — Preview Use Case
// ============================================================
// Builds the first few batches of a pass on a single worker and
// describes each row, for eyeballing what the model will see:
//   1. Shard the split for this rank (epoch 1 for train)
//   2. Assemble and collate the first `count` batches
//   3. Summarise each row: padding, supervised span, target ids,
//      and the decoded target block when a tokenizer is loaded

use anyhow::Result;

use crate::application::pipeline_use_case::{PreparedPipeline, RunConfig, Split};
use crate::data::{
    assembler::BatchAssembler,
    collator::{CollatedBatch, IGNORE_INDEX},
};
use crate::domain::error::PipelineError;

/// One collated row, summarised.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPreview {
    pub padding:    usize,
    pub real:       usize,
    pub supervised: usize,
    /// Ids of the supervised (final block) positions.
    pub target_ids: Vec<i64>,
    pub target_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchPreview {
    pub index:           usize,
    pub shape:           [usize; 2],
    pub has_labels_mask: bool,
    pub supervised:      usize,
    pub rows:            Vec<RowPreview>,
}

pub struct PreviewUseCase {
    pipeline: PreparedPipeline,
}

impl PreviewUseCase {
    pub fn new(config: RunConfig) -> Result<Self> {
        Ok(Self { pipeline: PreparedPipeline::load(config)? })
    }

    pub fn preview(&self, split: Split, count: usize) -> Result<Vec<BatchPreview>> {
        let (corpus, noise) = self
            .pipeline
            .corpora(split)
            .ok_or_else(|| PipelineError::config(format!("no {} corpus configured", split.name())))?;

        let epoch   = if split == Split::Train { 1 } else { 0 };
        let cfg     = self.pipeline.worker_config(split, epoch, 0)?;
        let indices = self.pipeline.rank_indices(split, epoch)?;
        let collator = self.pipeline.collator()?;

        let mut out = Vec::with_capacity(count);
        for (index, batch) in BatchAssembler::new(corpus, noise, &cfg, indices)?
            .take(count)
            .enumerate()
        {
            let collated = collator.collate(&batch?);
            out.push(BatchPreview {
                index,
                shape: collated.shape(),
                has_labels_mask: collated.labels_mask.is_some(),
                supervised: collated.supervised_tokens(),
                rows: self.rows(&collated)?,
            });
        }
        Ok(out)
    }

    fn rows(&self, batch: &CollatedBatch) -> Result<Vec<RowPreview>> {
        let mut rows = Vec::with_capacity(batch.batch_size());

        for r in 0..batch.batch_size() {
            let real    = batch.attention_mask[r].iter().filter(|&&m| m == 1).count();
            let in_mask = |c: usize| batch.labels_mask.as_ref().map_or(true, |m| m[r][c]);

            let target_ids: Vec<i64> = batch.labels[r]
                .iter()
                .enumerate()
                .filter(|&(c, &l)| l != IGNORE_INDEX && in_mask(c))
                .map(|(_, &l)| l)
                .collect();

            let target_text = match &self.pipeline.tokenizer {
                Some(tok) => {
                    let ids: Vec<u32> = target_ids.iter().map(|&t| t as u32).collect();
                    Some(tok.decode(&ids)?)
                }
                None => None,
            };

            rows.push(RowPreview {
                padding: batch.max_len - real,
                real,
                supervised: target_ids.len(),
                target_ids,
                target_text,
            });
        }
        Ok(rows)
    }
}
