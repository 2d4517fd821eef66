// ============================================================
// Layer 6 — Pass Statistics Logger
// ============================================================
// Summarises each pass over a corpus and appends it to a CSV.
//
// Recorded per pass (train epochs and the validation pass):
//   split, epoch          which pass this row describes
//   documents, samples    consumed / produced by the assemblers
//   batches, discarded    emitted batches, dropped leftover samples
//   tokens, padding       real and padding positions across batches
//   supervised            positions the loss will count
//   min_len, max_len      range of collated row lengths
//   masked_batches        batches that carried a labels_mask
//
// Output file: <run_dir>/pipeline_stats.csv
//
// Example CSV output:
//   split,epoch,documents,samples,batches,discarded,tokens,padding,supervised,min_len,max_len,masked_batches
//   train,1,120,3410,426,2,1482112,27392,436224,1024,3584,426

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use crate::data::assembler::AssemblerStats;
use crate::data::collator::CollatedBatch;

const CSV_HEADER: &str =
    "split,epoch,documents,samples,batches,discarded,tokens,padding,supervised,min_len,max_len,masked_batches";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    pub split:          String,
    pub epoch:          usize,
    pub documents:      usize,
    pub samples:        usize,
    pub batches:        usize,
    pub discarded:      usize,
    pub tokens:         usize,
    pub padding:        usize,
    pub supervised:     usize,
    pub min_len:        usize,
    pub max_len:        usize,
    pub masked_batches: usize,
}

impl PassStats {
    pub fn new(split: impl Into<String>, epoch: usize) -> Self {
        Self { split: split.into(), epoch, ..Self::default() }
    }

    /// Account for one collated batch. `supervised` comes from the
    /// materialised tensors so it reflects what the loss will see.
    pub fn record_batch(&mut self, batch: &CollatedBatch, supervised: usize) {
        self.min_len = if self.batches == 0 {
            batch.max_len
        } else {
            self.min_len.min(batch.max_len)
        };
        self.max_len     = self.max_len.max(batch.max_len);
        self.batches    += 1;
        self.tokens     += batch.real_tokens();
        self.padding    += batch.padding_tokens();
        self.supervised += supervised;
        if batch.labels_mask.is_some() {
            self.masked_batches += 1;
        }
    }

    /// Fold in the assembler's own counters. Batch counts come from
    /// record_batch, so only documents, samples and discards are taken.
    pub fn record_assembler(&mut self, stats: AssemblerStats) {
        self.documents += stats.documents;
        self.samples   += stats.samples;
        self.discarded += stats.discarded;
    }

    /// Combine the stats of another worker from the same pass.
    pub fn merge(&mut self, other: &PassStats) {
        if other.batches > 0 {
            self.min_len = if self.batches == 0 {
                other.min_len
            } else {
                self.min_len.min(other.min_len)
            };
        }
        self.max_len         = self.max_len.max(other.max_len);
        self.documents      += other.documents;
        self.samples        += other.samples;
        self.batches        += other.batches;
        self.discarded      += other.discarded;
        self.tokens         += other.tokens;
        self.padding        += other.padding;
        self.supervised     += other.supervised;
        self.masked_batches += other.masked_batches;
    }

    /// Fraction of collated positions that are padding.
    pub fn padding_ratio(&self) -> f64 {
        let total = self.tokens + self.padding;
        if total == 0 { 0.0 } else { self.padding as f64 / total as f64 }
    }
}

/// Appends pass statistics to a CSV file.
pub struct StatsLogger {
    csv_path: PathBuf,
}

impl StatsLogger {
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("pipeline_stats.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, s: &PassStats) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            s.split,
            s.epoch,
            s.documents,
            s.samples,
            s.batches,
            s.discarded,
            s.tokens,
            s.padding,
            s.supervised,
            s.min_len,
            s.max_len,
            s.masked_batches,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
