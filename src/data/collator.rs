// ============================================================
// Layer 4 — Collator
// ============================================================
// Turns a batch of ragged samples into rectangular rows.
//
// Per sample:
//   1. flatten all blocks into one id sequence
//   2. reverse it
//   3. mask = all ones, labels = copy of the reversed ids
//
// Across the batch:
//   4. pad every reversed row at its end up to max_len
//      (ids → pad id or eos, labels → -100, mask → 0)
//   5. flip each row back to forward order
//
// Steps 4 + 5 leave the padding at the FRONT of each row, so the
// final block of every sample lines up at the right edge:
//
//   lengths 5 and 8, pad = 0:
//     [0 0 0 a b c d e]
//     [f g h i j k l m]
//
// When max_len differs from block_size (history or noise made the
// rows longer than one block) a labels_mask is added: true on the
// trailing block_size positions, false on the leading rest. Loss
// code must only count positions where it is true.

use serde::{Deserialize, Serialize};

use crate::domain::sample::Sample;
use crate::domain::traits::SpecialTokens;

/// Label value ignored by the loss.
pub const IGNORE_INDEX: i64 = -100;

/// A collated batch; every row of every field has `max_len` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollatedBatch {
    pub input_ids:      Vec<Vec<i64>>,
    pub labels:         Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
    pub labels_mask:    Option<Vec<Vec<bool>>>,
    pub max_len:        usize,
}

impl CollatedBatch {
    pub fn batch_size(&self) -> usize {
        self.input_ids.len()
    }

    /// (batch_size, max_len)
    pub fn shape(&self) -> [usize; 2] {
        [self.batch_size(), self.max_len]
    }

    /// Count of real (non-padding) tokens.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask
            .iter()
            .map(|row| row.iter().filter(|&&m| m == 1).count())
            .sum()
    }

    pub fn padding_tokens(&self) -> usize {
        self.batch_size() * self.max_len - self.real_tokens()
    }

    /// Positions that count towards the loss: a real label that is
    /// also inside the labels_mask (when present).
    pub fn supervised_tokens(&self) -> usize {
        let mut total = 0;
        for (r, row) in self.labels.iter().enumerate() {
            for (c, &label) in row.iter().enumerate() {
                let in_mask = self
                    .labels_mask
                    .as_ref()
                    .map_or(true, |m| m[r][c]);
                if label != IGNORE_INDEX && in_mask {
                    total += 1;
                }
            }
        }
        total
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Collator {
    block_size: usize,
    pad_id:     i64,
}

impl Collator {
    pub fn new(block_size: usize, tokens: &impl SpecialTokens) -> Self {
        Self {
            block_size,
            pad_id: i64::from(tokens.pad_or_eos()),
        }
    }

    pub fn collate(&self, batch: &[Sample]) -> CollatedBatch {
        // ── Flatten + reverse ─────────────────────────────────────────────────
        let reversed: Vec<Vec<i64>> = batch
            .iter()
            .map(|s| s.flatten().into_iter().rev().map(i64::from).collect())
            .collect();

        let max_len = reversed.iter().map(Vec::len).max().unwrap_or(0);

        // ── Pad the reversed rows, then flip back ─────────────────────────────
        let mut input_ids      = Vec::with_capacity(batch.len());
        let mut labels         = Vec::with_capacity(batch.len());
        let mut attention_mask = Vec::with_capacity(batch.len());

        for row in &reversed {
            input_ids.push(pad_then_flip(row, max_len, self.pad_id));
            labels.push(pad_then_flip(row, max_len, IGNORE_INDEX));
            attention_mask.push(pad_then_flip(&vec![1; row.len()], max_len, 0));
        }

        // ── Labels mask ───────────────────────────────────────────────────────
        let labels_mask = (max_len != self.block_size).then(|| {
            let context = max_len.saturating_sub(self.block_size);
            let mut row = vec![true; max_len];
            row[..context].fill(false);
            vec![row; batch.len()]
        });

        CollatedBatch {
            input_ids,
            labels,
            attention_mask,
            labels_mask,
            max_len,
        }
    }
}

/// Pad `reversed` at its end to `max_len`, then reverse the row.
fn pad_then_flip(reversed: &[i64], max_len: usize, pad: i64) -> Vec<i64> {
    let mut row = Vec::with_capacity(max_len);
    row.extend_from_slice(reversed);
    row.resize(max_len, pad);
    row.reverse();
    row
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::FixedSpecialTokens;
    use proptest::prelude::*;

    const PAD: u32 = 0;
    const EOS: u32 = 2;

    fn collator(block_size: usize) -> Collator {
        Collator::new(block_size, &FixedSpecialTokens::new(Some(PAD), EOS))
    }

    #[test]
    fn test_lengths_five_and_eight() {
        let batch = vec![
            Sample::new(vec![vec![11, 12, 13, 14, 15]]),
            Sample::new(vec![vec![21, 22, 23, 24], vec![25, 26, 27, 28]]),
        ];
        let out = collator(4).collate(&batch);

        assert_eq!(out.max_len, 8);
        assert_eq!(out.input_ids[0], vec![0, 0, 0, 11, 12, 13, 14, 15]);
        assert_eq!(out.attention_mask[0], vec![0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(out.labels[0][..3], [IGNORE_INDEX; 3]);
        assert_eq!(out.input_ids[1], vec![21, 22, 23, 24, 25, 26, 27, 28]);
    }

    #[test]
    fn test_single_block_batch_has_no_labels_mask() {
        let batch = vec![
            Sample::new(vec![vec![1, 2, 3, 4]]),
            Sample::new(vec![vec![5, 6, 7, 8]]),
        ];
        let out = collator(4).collate(&batch);
        assert!(out.labels_mask.is_none());
        assert_eq!(out.shape(), [2, 4]);
        assert_eq!(out.labels, out.input_ids);
    }

    #[test]
    fn test_labels_mask_marks_final_block() {
        let batch = vec![Sample::new(vec![vec![1; 4], vec![2; 4], vec![3; 4]])];
        let out   = collator(4).collate(&batch);

        let mask = out.labels_mask.as_ref().unwrap();
        assert_eq!(mask[0][..8], [false; 8]);
        assert_eq!(mask[0][8..], [true; 4]);
        assert_eq!(out.supervised_tokens(), 4);
    }

    #[test]
    fn test_eos_used_when_no_pad() {
        let c     = Collator::new(2, &FixedSpecialTokens::new(None, EOS));
        let batch = vec![
            Sample::new(vec![vec![7, 7]]),
            Sample::new(vec![vec![8, 8], vec![9, 9]]),
        ];
        let out = c.collate(&batch);
        assert_eq!(out.input_ids[0], vec![2, 2, 7, 7]);
    }

    #[test]
    fn test_padding_counts() {
        let batch = vec![
            Sample::new(vec![vec![1; 4]]),
            Sample::new(vec![vec![1; 4], vec![1; 4]]),
        ];
        let out = collator(4).collate(&batch);
        assert_eq!(out.real_tokens(), 12);
        assert_eq!(out.padding_tokens(), 4);
        // Only the final block of each row is supervised
        assert_eq!(out.supervised_tokens(), 8);
    }

    proptest! {
        #[test]
        fn prop_rows_are_rectangular_and_left_padded(
            lens in prop::collection::vec(1usize..5, 1..6),
            block_size in 1usize..5,
        ) {
            let batch: Vec<Sample> = lens
                .iter()
                .map(|&n| Sample::new(vec![vec![9; block_size]; n]))
                .collect();
            let out = collator(block_size).collate(&batch);
            let max_len = lens.iter().max().unwrap() * block_size;

            prop_assert_eq!(out.max_len, max_len);
            for (row, &n) in out.attention_mask.iter().zip(&lens) {
                prop_assert_eq!(row.len(), max_len);
                let pad = max_len - n * block_size;
                prop_assert!(row[..pad].iter().all(|&m| m == 0));
                prop_assert!(row[pad..].iter().all(|&m| m == 1));
            }
            prop_assert_eq!(out.labels_mask.is_some(), max_len != block_size);
        }
    }
}
