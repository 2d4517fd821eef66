// ============================================================
// Layer 2 — PipelineUseCase
// ============================================================
// Orchestrates full passes of the segment pipeline in order:
//
//   Step 1: Validate config and derive block / history sizes
//   Step 2: Save the run config                 (Layer 6 - infra)
//   Step 3: Load tokenizer, resolve pad / eos   (Layer 6 - infra)
//   Step 4: Load train / valid corpora          (Layer 4 - data)
//   Step 5: Load and group the noise corpora    (Layer 4 - data)
//   Step 6: For each epoch, shard by rank and worker, drain every
//           worker's assembler on its own thread, materialise the
//           batches as tensors                  (Layers 4 + 5)
//   Step 7: Same for one validation pass
//   Step 8: Log / append pass statistics        (Layer 6 - infra)
//
// Block and history sizes are derived from the model surface:
//
//   block_size         = input_size - 2 * num_mem_tokens - xl_cache_size
//   history_n_segments = max_n_segments - 1 - noise_n_segments
//   per-worker batch   = batch_size * gradient_accumulation_steps
//
// Reference: Rust Book §16 (Scoped threads)

use anyhow::{Context, Result};
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    assembler::BatchAssembler,
    collator::Collator,
    config::SegmentConfig,
    dataset::TokenCorpus,
    loader::{JsonlCorpusLoader, TextCorpusLoader},
    noise::group_into_blocks,
    sharding::{worker_shards, DistributedShard},
};
use crate::domain::{
    error::{PipelineError, PipelineResult},
    traits::{Corpus, DocumentSource, FixedSpecialTokens, SpecialTokens},
};
use crate::infra::{
    metrics::{PassStats, StatsLogger},
    run_dir::RunDirectory,
    tokenizer_store::{HfTokenizer, TokenizerStore},
};
use crate::ml::batcher::{SegmentBatch, SegmentBatcher};

/// CPU backend used to materialise batches.
pub type PipelineBackend = NdArray;

// ─── Run Configuration ───────────────────────────────────────────────────────
// Everything needed to reproduce a run. Saved as JSON in the run
// directory and reloadable with --config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub train_corpus:       String,
    pub valid_corpus:       Option<String>,
    pub noise_corpus:       String,
    pub valid_noise_corpus: Option<String>,
    pub tokenizer:          Option<String>,
    pub pad_id:             Option<u32>,
    pub eos_id:             Option<u32>,
    pub run_dir:            Option<String>,

    pub input_size:       usize,
    pub num_mem_tokens:   Option<usize>,
    pub xl_cache_size:    Option<usize>,
    pub max_n_segments:   usize,
    pub noise_n_segments: usize,

    pub batch_size:                  usize,
    pub gradient_accumulation_steps: usize,
    pub valid_max_samples:           Option<usize>,
    pub epochs:                      usize,
    pub seed:                        u64,

    pub rank:           usize,
    pub world_size:     usize,
    pub drop_last:      bool,
    pub data_n_workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            train_corpus:       "data/tokenized/train".to_string(),
            valid_corpus:       None,
            noise_corpus:       "data/noise/train".to_string(),
            valid_noise_corpus: None,
            tokenizer:          None,
            pad_id:             None,
            eos_id:             None,
            run_dir:            None,

            input_size:       512,
            num_mem_tokens:   None,
            xl_cache_size:    None,
            max_n_segments:   3,
            noise_n_segments: 1,

            batch_size:                  8,
            gradient_accumulation_steps: 1,
            valid_max_samples:           Some(100),
            epochs:                      1,
            seed:                        42,

            rank:           0,
            world_size:     1,
            drop_last:      false,
            data_n_workers: 2,
        }
    }
}

/// Which corpus a pass runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Valid,
}

impl Split {
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
        }
    }
}

impl RunConfig {
    /// Tokens per block after reserving memory and cache slots.
    pub fn block_size(&self) -> PipelineResult<usize> {
        let reserved = 2 * self.num_mem_tokens.unwrap_or(0) + self.xl_cache_size.unwrap_or(0);
        match self.input_size.checked_sub(reserved) {
            Some(b) if b > 0 => Ok(b),
            _ => Err(PipelineError::config(format!(
                "block_size must be positive: input_size {} leaves nothing after {} reserved memory/cache slots",
                self.input_size, reserved
            ))),
        }
    }

    pub fn history_n_segments(&self) -> PipelineResult<usize> {
        self.max_n_segments
            .checked_sub(1 + self.noise_n_segments)
            .ok_or_else(|| {
                PipelineError::config(format!(
                    "max_n_segments ({}) must be at least noise_n_segments + 1 ({})",
                    self.max_n_segments,
                    self.noise_n_segments + 1
                ))
            })
    }

    pub fn per_worker_batch_size(&self) -> usize {
        self.batch_size * self.gradient_accumulation_steps
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.batch_size == 0 || self.gradient_accumulation_steps == 0 {
            return Err(PipelineError::config(
                "batch_size and gradient_accumulation_steps must be positive",
            ));
        }
        if self.data_n_workers == 0 {
            return Err(PipelineError::config("data_n_workers must be positive"));
        }
        self.shard()?;
        self.segment_config(Split::Train)?.validate()?;
        self.segment_config(Split::Valid)?.validate()
    }

    /// This rank's shard of the corpus.
    pub fn shard(&self) -> PipelineResult<DistributedShard> {
        Ok(DistributedShard::new(self.rank, self.world_size)?.with_drop_last(self.drop_last))
    }

    /// Pipeline parameters for a split: training shuffles over the
    /// whole corpus, validation keeps order and caps the documents
    /// this rank reads.
    pub fn segment_config(&self, split: Split) -> PipelineResult<SegmentConfig> {
        let (shuffle, max_samples) = match split {
            Split::Train => (true, None),
            Split::Valid => (false, self.valid_max_samples),
        };
        Ok(SegmentConfig {
            block_size: self.block_size()?,
            history_n_segments: self.history_n_segments()?,
            noise_n_segments: self.noise_n_segments,
            batch_size: self.per_worker_batch_size(),
            max_samples,
            shuffle,
            seed: self.seed,
        })
    }
}

/// Seed of one worker's assembler for one pass.
pub fn worker_seed(seed: u64, epoch: usize, worker: usize) -> u64 {
    seed.wrapping_add((epoch as u64) << 16)
        .wrapping_add(worker as u64)
}

// ─── Prepared Pipeline ───────────────────────────────────────────────────────
/// Corpora and collaborators loaded once, shared by every pass.
pub struct PreparedPipeline {
    pub config:      RunConfig,
    pub tokenizer:   Option<HfTokenizer>,
    pub tokens:      FixedSpecialTokens,
    pub train:       TokenCorpus,
    pub valid:       Option<TokenCorpus>,
    pub train_noise: TokenCorpus,
    pub valid_noise: TokenCorpus,
}

impl PreparedPipeline {
    pub fn load(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let block_size = config.block_size()?;
        tracing::info!(
            "block_size={} history_n_segments={} noise_n_segments={} per-worker batch={} (rows up to {} tokens)",
            block_size,
            config.history_n_segments()?,
            config.noise_n_segments,
            config.per_worker_batch_size(),
            config.segment_config(Split::Train)?.max_tokens_per_sample()
        );

        // ── Tokenizer and special ids ─────────────────────────────────────────
        let tokenizer = config
            .tokenizer
            .as_ref()
            .map(|p| TokenizerStore::new(p).load())
            .transpose()?;
        let tokens = resolve_special_tokens(&config, tokenizer.as_ref())?;

        // ── Corpora ───────────────────────────────────────────────────────────
        let train = TokenCorpus::new(JsonlCorpusLoader::new(&config.train_corpus).load_all()?);
        let valid = config
            .valid_corpus
            .as_ref()
            .map(|p| JsonlCorpusLoader::new(p).load_all().map(TokenCorpus::new))
            .transpose()?;
        tracing::info!(
            "Train corpus: {} documents, {} tokens",
            Corpus::len(&train),
            train.total_tokens()
        );
        if let Some(v) = &valid {
            tracing::info!("Valid corpus: {} documents, {} tokens", Corpus::len(v), v.total_tokens());
        }

        let train_noise = load_noise(&config.noise_corpus, block_size, tokenizer.as_ref())?;
        let valid_noise = match &config.valid_noise_corpus {
            Some(p) => load_noise(p, block_size, tokenizer.as_ref())?,
            None => train_noise.clone(),
        };

        Ok(Self { config, tokenizer, tokens, train, valid, train_noise, valid_noise })
    }

    pub fn collator(&self) -> PipelineResult<Collator> {
        Ok(Collator::new(self.config.block_size()?, &self.tokens))
    }

    /// (corpus, noise) for a split, if that split was configured.
    pub fn corpora(&self, split: Split) -> Option<(&TokenCorpus, &TokenCorpus)> {
        match split {
            Split::Train => Some((&self.train, &self.train_noise)),
            Split::Valid => self.valid.as_ref().map(|v| (v, &self.valid_noise)),
        }
    }

    /// This rank's document positions for a pass, cut to the split's
    /// `max_samples` before they are spread over workers.
    pub fn rank_indices(&self, split: Split, epoch: usize) -> PipelineResult<Vec<usize>> {
        let (corpus, _) = self
            .corpora(split)
            .ok_or_else(|| PipelineError::config(format!("no {} corpus configured", split.name())))?;

        let shard = match split {
            Split::Train => self.config.shard()?.with_shuffle(self.config.seed),
            Split::Valid => self.config.shard()?,
        };
        let mut indices = shard.indices(corpus.len(), epoch as u64);
        if let Some(max) = self.config.segment_config(split)?.max_samples {
            indices.truncate(max);
        }
        Ok(indices)
    }

    /// Assembler config of one worker: its own seed, and no document
    /// cap since `rank_indices` already applied it.
    pub fn worker_config(&self, split: Split, epoch: usize, worker: usize) -> PipelineResult<SegmentConfig> {
        let base = self.config.segment_config(split)?;
        Ok(SegmentConfig {
            seed: worker_seed(base.seed, epoch, worker),
            max_samples: None,
            ..base
        })
    }

    /// Run one pass over a split on all workers and merge their stats.
    pub fn run_pass(&self, split: Split, epoch: usize) -> Result<PassStats> {
        let (corpus, noise) = self
            .corpora(split)
            .with_context(|| format!("no {} corpus configured", split.name()))?;
        let batcher = SegmentBatcher::new(self.collator()?);
        let shards  = worker_shards(&self.rank_indices(split, epoch)?, self.config.data_n_workers);

        tracing::debug!(
            "{} pass {}: rank {} / {} with {} workers",
            split.name(),
            epoch,
            self.config.rank,
            self.config.world_size,
            shards.len()
        );

        let configs = (0..shards.len())
            .map(|w| self.worker_config(split, epoch, w))
            .collect::<PipelineResult<Vec<_>>>()?;

        let results: Vec<Result<PassStats>> = std::thread::scope(|s| {
            let handles: Vec<_> = shards
                .into_iter()
                .zip(configs)
                .map(|(indices, cfg)| {
                    s.spawn(move || run_worker(corpus, noise, &cfg, indices, batcher, split, epoch))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(w, h)| {
                    h.join()
                        .map_err(|_| anyhow::anyhow!("data worker {w} panicked"))?
                })
                .collect()
        });

        let mut total = PassStats::new(split.name(), epoch);
        for r in results {
            total.merge(&r?);
        }

        tracing::info!(
            "{} pass {}: {} batches from {} documents ({} samples, {} dropped), len {}..={}, padding {:.1}%",
            split.name(),
            epoch,
            total.batches,
            total.documents,
            total.samples,
            total.discarded,
            total.min_len,
            total.max_len,
            total.padding_ratio() * 100.0,
        );
        Ok(total)
    }
}

/// Drain one worker's assembler, materialising every batch.
fn run_worker<C: Corpus, N: Corpus>(
    corpus:  &C,
    noise:   &N,
    cfg:     &SegmentConfig,
    indices: Vec<usize>,
    batcher: SegmentBatcher,
    split:   Split,
    epoch:   usize,
) -> Result<PassStats> {
    let device    = NdArrayDevice::default();
    let mut stats = PassStats::new(split.name(), epoch);
    let mut asm   = BatchAssembler::new(corpus, noise, cfg, indices)?;
    tracing::debug!("worker reading {} documents", asm.order().len());

    for batch in asm.by_ref() {
        let (collated, tensors) =
            batcher.materialise::<PipelineBackend>(&batch?, &device);
        stats.record_batch(&collated, tensors.supervised_count());
    }

    let counts = asm.stats();
    tracing::debug!(
        "worker done: {} documents, {} samples, {} batches, {} dropped",
        counts.documents,
        counts.samples,
        counts.batches,
        counts.discarded
    );
    stats.record_assembler(counts);
    Ok(stats)
}

fn resolve_special_tokens(
    config:    &RunConfig,
    tokenizer: Option<&HfTokenizer>,
) -> PipelineResult<FixedSpecialTokens> {
    let pad = config.pad_id.or_else(|| tokenizer.and_then(|t| t.pad_id()));
    let eos = config
        .eos_id
        .or_else(|| tokenizer.map(|t| t.eos_id()))
        .ok_or_else(|| {
            PipelineError::config("an eos id is required: pass --eos-id or --tokenizer")
        })?;
    Ok(FixedSpecialTokens::new(pad, eos))
}

/// Load a noise corpus and cut it into single-block documents.
///
/// A directory holding .jsonl files is read as pre-tokenized;
/// anything else is raw text and needs the tokenizer.
fn load_noise(path: &str, block_size: usize, tokenizer: Option<&HfTokenizer>) -> Result<TokenCorpus> {
    let docs = if holds_jsonl(Path::new(path)) {
        JsonlCorpusLoader::new(path).load_all()?
    } else {
        let tok = tokenizer.with_context(|| {
            format!("noise corpus '{path}' is raw text; a --tokenizer is required")
        })?;
        TextCorpusLoader::new(path, tok).load_all()?
    };

    let blocks = group_into_blocks(&docs, block_size);
    tracing::info!(
        "Noise corpus '{}': {} documents grouped into {} blocks of {}",
        path,
        docs.len(),
        blocks.len(),
        block_size
    );
    Ok(TokenCorpus::new(blocks))
}

fn holds_jsonl(path: &Path) -> bool {
    if path.is_file() {
        return path.extension().is_some_and(|e| e == "jsonl");
    }
    std::fs::read_dir(path)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.path().extension().is_some_and(|x| x == "jsonl"))
        })
        .unwrap_or(false)
}

// ─── PipelineUseCase ─────────────────────────────────────────────────────────
pub struct PipelineUseCase {
    config: RunConfig,
}

impl PipelineUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Run every training epoch and the validation pass.
    pub fn execute(&self) -> Result<Vec<PassStats>> {
        self.config.validate()?;

        // ── Run directory ─────────────────────────────────────────────────────
        let logger = match &self.config.run_dir {
            Some(dir) => {
                let run_dir = RunDirectory::new(dir)?;
                run_dir.save_config(&self.config)?;
                Some(StatsLogger::new(run_dir.path())?)
            }
            None => {
                tracing::warn!("run_dir is not set: config and pass statistics will not be saved.");
                None
            }
        };

        let pipeline = PreparedPipeline::load(self.config.clone())?;
        let mut all  = Vec::new();

        for epoch in 1..=self.config.epochs {
            all.push(pipeline.run_pass(Split::Train, epoch)?);
        }
        if pipeline.valid.is_some() {
            all.push(pipeline.run_pass(Split::Valid, 0)?);
        }

        if let Some(logger) = &logger {
            for stats in &all {
                logger.log(stats)?;
            }
            tracing::info!("Pass statistics written to '{}'", logger.csv_path().display());
        }
        Ok(all)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::run_dir::load_config_file;
    use std::fs;
    use tempfile::TempDir;

    fn write_jsonl(path: &Path, docs: &[Vec<u32>]) {
        let body: String = docs
            .iter()
            .map(|ids| {
                serde_json::json!({ "input_ids": ids, "attention_mask": vec![1; ids.len()] })
                    .to_string()
                    + "\n"
            })
            .collect();
        fs::write(path, body).unwrap();
    }

    /// Train: 6 docs of 5 blocks; valid: 2 docs of 3 blocks;
    /// noise: one long stream. block_size = 4.
    fn fixture(dir: &TempDir) -> RunConfig {
        let train: Vec<Vec<u32>> = (0..6).map(|d| vec![d + 10; 20]).collect();
        let valid: Vec<Vec<u32>> = (0..2).map(|d| vec![d + 50; 12]).collect();
        let noise: Vec<Vec<u32>> = vec![(900..940).collect()];

        fs::create_dir_all(dir.path().join("train")).unwrap();
        fs::create_dir_all(dir.path().join("noise")).unwrap();
        write_jsonl(&dir.path().join("train/part-0.jsonl"), &train);
        write_jsonl(&dir.path().join("valid.jsonl"), &valid);
        write_jsonl(&dir.path().join("noise/part-0.jsonl"), &noise);

        RunConfig {
            train_corpus: dir.path().join("train").display().to_string(),
            valid_corpus: Some(dir.path().join("valid.jsonl").display().to_string()),
            noise_corpus: dir.path().join("noise").display().to_string(),
            pad_id: Some(0),
            eos_id: Some(2),
            run_dir: Some(dir.path().join("run").display().to_string()),
            input_size: 4,
            max_n_segments: 3,
            noise_n_segments: 1,
            batch_size: 2,
            epochs: 2,
            data_n_workers: 2,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_block_size_reserves_memory_and_cache() {
        let cfg = RunConfig {
            input_size: 512,
            num_mem_tokens: Some(10),
            xl_cache_size: Some(12),
            ..RunConfig::default()
        };
        assert_eq!(cfg.block_size().unwrap(), 480);

        let bad = RunConfig { num_mem_tokens: Some(256), ..cfg };
        assert!(matches!(bad.block_size(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_history_derived_from_segments() {
        let cfg = RunConfig { max_n_segments: 4, noise_n_segments: 1, ..RunConfig::default() };
        assert_eq!(cfg.history_n_segments().unwrap(), 2);

        let bad = RunConfig { max_n_segments: 1, noise_n_segments: 1, ..RunConfig::default() };
        assert!(bad.history_n_segments().is_err());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_split_configs() {
        let cfg = RunConfig { batch_size: 4, gradient_accumulation_steps: 2, ..RunConfig::default() };
        let train = cfg.segment_config(Split::Train).unwrap();
        let valid = cfg.segment_config(Split::Valid).unwrap();

        assert_eq!(train.batch_size, 8);
        assert!(train.shuffle && train.max_samples.is_none());
        assert!(!valid.shuffle);
        assert_eq!(valid.max_samples, Some(100));
    }

    #[test]
    fn test_invalid_rank_rejected() {
        let cfg = RunConfig { rank: 3, world_size: 2, ..RunConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_worker_seeds_differ() {
        assert_ne!(worker_seed(42, 1, 0), worker_seed(42, 1, 1));
        assert_ne!(worker_seed(42, 1, 0), worker_seed(42, 2, 0));
    }

    #[test]
    fn test_execute_runs_all_passes() {
        let dir   = TempDir::new().unwrap();
        let cfg   = fixture(&dir);
        let stats = PipelineUseCase::new(cfg.clone()).execute().unwrap();

        // 2 train epochs + 1 validation pass
        assert_eq!(stats.len(), 3);
        for s in &stats[..2] {
            // 6 docs × 4 windows, split over 2 workers of 3 docs → 12 each
            assert_eq!(s.documents, 6);
            assert_eq!(s.samples, 24);
            assert_eq!(s.batches, 12);
            assert_eq!(s.discarded, 0);
            assert_eq!(s.masked_batches, 12);
            // history ≤ 1 block + 1 noise + target
            assert!(s.max_len <= 12);
            assert_eq!(s.supervised, 12 * 2 * 4);
        }
        assert_eq!(stats[2].split, "valid");
        // 1 doc per worker, 2 windows each → 1 batch per worker
        assert_eq!(stats[2].batches, 2);

        let run_dir = RunDirectory::new(cfg.run_dir.as_ref().unwrap()).unwrap();
        assert_eq!(load_config_file(run_dir.path()).unwrap(), cfg);
        let csv = fs::read_to_string(dir.path().join("run/pipeline_stats.csv")).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_valid_cap_applies_per_rank_not_per_worker() {
        let dir = TempDir::new().unwrap();
        let cfg = fixture(&dir);
        let valid: Vec<Vec<u32>> = (0..8).map(|d| vec![d + 50; 12]).collect();
        write_jsonl(&dir.path().join("valid.jsonl"), &valid);

        let cfg = RunConfig {
            run_dir: None,
            valid_max_samples: Some(2),
            data_n_workers: 4,
            ..cfg
        };
        let pipeline = PreparedPipeline::load(cfg).unwrap();
        assert_eq!(pipeline.rank_indices(Split::Valid, 0).unwrap(), vec![0, 1]);

        // 2 docs × 2 windows, each doc on its own worker → 1 batch each
        let stats = pipeline.run_pass(Split::Valid, 0).unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.batches, 2);
    }

    #[test]
    fn test_drop_last_shortens_rank_shard() {
        let dir  = TempDir::new().unwrap();
        let base = RunConfig { run_dir: None, world_size: 4, rank: 3, ..fixture(&dir) };

        // 6 train docs over 4 ranks: padded to 8, or cut to 4
        let padded = PreparedPipeline::load(base.clone()).unwrap();
        assert_eq!(padded.rank_indices(Split::Train, 1).unwrap().len(), 2);

        let cut = PreparedPipeline::load(RunConfig { drop_last: true, ..base }).unwrap();
        assert_eq!(cut.rank_indices(Split::Train, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_passes_are_reproducible() {
        let dir      = TempDir::new().unwrap();
        let cfg      = RunConfig { run_dir: None, ..fixture(&dir) };
        let pipeline = PreparedPipeline::load(cfg).unwrap();

        let a = pipeline.run_pass(Split::Train, 1).unwrap();
        let b = pipeline.run_pass(Split::Train, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_grouped_into_blocks() {
        let dir      = TempDir::new().unwrap();
        let pipeline = PreparedPipeline::load(RunConfig { run_dir: None, ..fixture(&dir) }).unwrap();

        // 40 noise tokens, block_size 4 → starts 0..36 step 4 → 9 blocks
        assert_eq!(Corpus::len(&pipeline.train_noise), 9);
        assert_eq!(Corpus::len(&pipeline.valid_noise), 9);
    }

    #[test]
    fn test_missing_eos_is_config_error() {
        let dir = TempDir::new().unwrap();
        let cfg = RunConfig { eos_id: None, run_dir: None, ..fixture(&dir) };
        assert!(PreparedPipeline::load(cfg).is_err());
    }

    #[test]
    fn test_raw_text_noise_requires_tokenizer() {
        let dir = TempDir::new().unwrap();
        let cfg = fixture(&dir);
        fs::create_dir_all(dir.path().join("wiki")).unwrap();
        fs::write(dir.path().join("wiki/a.txt"), "some unrelated text").unwrap();

        let cfg = RunConfig {
            noise_corpus: dir.path().join("wiki").display().to_string(),
            run_dir: None,
            ..cfg
        };
        let err = PreparedPipeline::load(cfg).err().unwrap();
        assert!(err.to_string().contains("tokenizer"));
    }
}
