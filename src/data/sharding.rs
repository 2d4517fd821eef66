// ============================================================
// Layer 4 — Rank and Worker Sharding
// ============================================================
// Partitions a corpus' document positions so that every training
// rank, and every data-loading worker inside a rank, runs its own
// assembler over a disjoint slice of documents.
//
// Rank shards follow the usual distributed-sampler rules:
//   1. positions 0..len, shuffled with seed + epoch if enabled
//   2. without drop_last: repeat positions from the front until
//      the list divides evenly by world_size
//      with drop_last: cut the list down to a multiple instead
//   3. rank r takes every world_size-th position starting at r
//
// Worker shards split one rank's list the same strided way.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributedShard {
    pub rank:       usize,
    pub world_size: usize,
    pub shuffle:    bool,
    pub seed:       u64,
    pub drop_last:  bool,
}

impl DistributedShard {
    pub fn new(rank: usize, world_size: usize) -> PipelineResult<Self> {
        if world_size == 0 {
            return Err(PipelineError::config("world_size must be positive"));
        }
        if rank >= world_size {
            return Err(PipelineError::config(format!(
                "rank {rank} out of range for world_size {world_size}"
            )));
        }
        Ok(Self { rank, world_size, shuffle: false, seed: 0, drop_last: false })
    }

    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed    = seed;
        self
    }

    pub fn with_drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// Number of positions each rank receives for a corpus of `len`.
    pub fn num_samples(&self, len: usize) -> usize {
        if self.drop_last {
            len / self.world_size
        } else {
            len.div_ceil(self.world_size)
        }
    }

    /// This rank's document positions for the given epoch.
    pub fn indices(&self, len: usize, epoch: u64) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }

        let mut all: Vec<usize> = (0..len).collect();
        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(epoch));
            all.shuffle(&mut rng);
        }

        let total = self.num_samples(len) * self.world_size;
        if total > all.len() {
            // Pad by cycling from the front
            let padding: Vec<usize> = all.iter().copied().cycle().take(total - len).collect();
            all.extend(padding);
        } else {
            all.truncate(total);
        }

        all.into_iter()
            .skip(self.rank)
            .step_by(self.world_size)
            .collect()
    }
}

/// Split one rank's positions into `n_workers` strided, disjoint lists.
pub fn worker_shards(indices: &[usize], n_workers: usize) -> Vec<Vec<usize>> {
    let n = n_workers.max(1);
    (0..n)
        .map(|w| indices.iter().copied().skip(w).step_by(n).collect())
        .collect()
}
