// ============================================================
// Layer 5 — Segment Batcher (Burn)
// ============================================================
// Materialises collated batches as Burn tensors on a device.
//
// All tensors have shape [batch_size, max_len]:
//
//   input_ids       Int   token ids, pad (or eos) at the front
//   labels          Int   same ids, -100 on padding
//   attention_mask  Int   1 = real token, 0 = padding
//   labels_mask     Bool  only when rows span more than one block;
//                         true on the trailing block_size positions
//
// SegmentBatcher implements Burn's Batcher trait, so a list of
// samples goes straight to tensors via collate + materialise.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Bool, ElementConversion, Int, Tensor, TensorData},
};

use crate::data::collator::{CollatedBatch, Collator, IGNORE_INDEX};
use crate::domain::sample::Sample;

// ─── SegmentBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SegmentBatch<B: Backend> {
    pub input_ids:      Tensor<B, 2, Int>,
    pub labels:         Tensor<B, 2, Int>,
    pub attention_mask: Tensor<B, 2, Int>,
    pub labels_mask:    Option<Tensor<B, 2, Bool>>,
}

impl<B: Backend> SegmentBatch<B> {
    pub fn from_collated(batch: &CollatedBatch, device: &B::Device) -> Self {
        let shape = batch.shape();

        Self {
            input_ids:      int_tensor(&batch.input_ids, shape, device),
            labels:         int_tensor(&batch.labels, shape, device),
            attention_mask: int_tensor(&batch.attention_mask, shape, device),
            labels_mask:    batch
                .labels_mask
                .as_ref()
                .map(|rows| bool_tensor(rows, shape, device)),
        }
    }

    /// Labels with every position outside `labels_mask` set to -100,
    /// which is what the loss should see.
    pub fn supervised_labels(&self) -> Tensor<B, 2, Int> {
        match &self.labels_mask {
            Some(mask) => self
                .labels
                .clone()
                .mask_fill(mask.clone().bool_not(), IGNORE_INDEX),
            None => self.labels.clone(),
        }
    }

    /// Number of positions the loss will count.
    pub fn supervised_count(&self) -> usize {
        let count: i64 = self
            .supervised_labels()
            .not_equal_elem(IGNORE_INDEX)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        count as usize
    }
}

fn int_tensor<B: Backend>(rows: &[Vec<i64>], shape: [usize; 2], device: &B::Device) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = rows.iter().flatten().copied().collect();
    Tensor::from_data(TensorData::new(flat, shape), device)
}

fn bool_tensor<B: Backend>(rows: &[Vec<bool>], shape: [usize; 2], device: &B::Device) -> Tensor<B, 2, Bool> {
    let flat: Vec<bool> = rows.iter().flatten().copied().collect();
    Tensor::from_data(TensorData::new(flat, shape), device)
}

// ─── SegmentBatcher ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy)]
pub struct SegmentBatcher {
    collator: Collator,
}

impl SegmentBatcher {
    pub fn new(collator: Collator) -> Self {
        Self { collator }
    }

    /// Collate and materialise, keeping the plain rows as well.
    pub fn materialise<B: Backend>(
        &self,
        items:  &[Sample],
        device: &B::Device,
    ) -> (CollatedBatch, SegmentBatch<B>) {
        let collated = self.collator.collate(items);
        let tensors  = SegmentBatch::from_collated(&collated, device);
        (collated, tensors)
    }
}

impl<B: Backend> Batcher<B, Sample, SegmentBatch<B>> for SegmentBatcher {
    fn batch(&self, items: Vec<Sample>, device: &B::Device) -> SegmentBatch<B> {
        self.materialise(&items, device).1
    }
}
