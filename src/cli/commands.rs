// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `run` and `preview`
// and all their configurable flags.
//
// Both share RunArgs. Passing --config <file> loads a saved
// run_config.json instead of reading the individual flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::pipeline_use_case::{RunConfig, Split};
use crate::infra::run_dir::load_config_file;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every training epoch and the validation pass
    Run(RunArgs),

    /// Print the first few batches of a split
    Preview(PreviewArgs),
}

/// Arguments shared by `run` and `preview`.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Saved run_config.json; when given, the flags below are ignored
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pre-tokenized training documents (.jsonl file or directory)
    #[arg(long, default_value = "data/tokenized/train")]
    pub train_corpus: String,

    /// Pre-tokenized validation documents
    #[arg(long)]
    pub valid_corpus: Option<String>,

    /// Noise documents: .jsonl, or raw .txt / .docx (needs --tokenizer)
    #[arg(long, default_value = "data/noise/train")]
    pub noise_corpus: String,

    /// Noise documents for validation; defaults to --noise-corpus
    #[arg(long)]
    pub valid_noise_corpus: Option<String>,

    /// tokenizer.json, or a directory containing one
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Padding id; falls back to the tokenizer's, then to eos
    #[arg(long)]
    pub pad_id: Option<u32>,

    /// End-of-sequence id; required unless --tokenizer provides one
    #[arg(long)]
    pub eos_id: Option<u32>,

    /// Where run_config.json and pipeline_stats.csv are written
    #[arg(long)]
    pub run_dir: Option<String>,

    /// Model input size in tokens, including memory and cache slots
    #[arg(long, default_value_t = 512)]
    pub input_size: usize,

    /// Memory tokens; each one takes two input slots
    #[arg(long)]
    pub num_mem_tokens: Option<usize>,

    #[arg(long)]
    pub xl_cache_size: Option<usize>,

    /// Blocks per sample: history + noise + target
    #[arg(long, default_value_t = 3)]
    pub max_n_segments: usize,

    /// Noise blocks inserted into every sample
    #[arg(long, default_value_t = 1)]
    pub noise_n_segments: usize,

    /// Samples per batch per step
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Multiplies the per-worker batch size
    #[arg(long, default_value_t = 1)]
    pub gradient_accumulation_steps: usize,

    /// Validation documents read by this rank, shared by its workers
    #[arg(long, default_value_t = 100)]
    pub valid_max_samples: usize,

    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// This process's rank among data-parallel processes
    #[arg(long, default_value_t = 0)]
    pub rank: usize,

    #[arg(long, default_value_t = 1)]
    pub world_size: usize,

    /// Cut rank shards to an even split instead of repeating documents
    #[arg(long)]
    pub drop_last: bool,

    /// Data worker threads per process
    #[arg(long, default_value_t = 2)]
    pub data_n_workers: usize,
}

impl RunArgs {
    /// The run configuration: the --config file if given, else the flags.
    pub fn resolve(self) -> Result<RunConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("Loading run config from '{}'", path.display());
                load_config_file(path)
            }
            None => Ok(self.into()),
        }
    }
}

/// Convert CLI RunArgs into the application-layer RunConfig.
/// The application layer never sees clap types.
impl From<RunArgs> for RunConfig {
    fn from(a: RunArgs) -> Self {
        RunConfig {
            train_corpus:       a.train_corpus,
            valid_corpus:       a.valid_corpus,
            noise_corpus:       a.noise_corpus,
            valid_noise_corpus: a.valid_noise_corpus,
            tokenizer:          a.tokenizer,
            pad_id:             a.pad_id,
            eos_id:             a.eos_id,
            run_dir:            a.run_dir,

            input_size:       a.input_size,
            num_mem_tokens:   a.num_mem_tokens,
            xl_cache_size:    a.xl_cache_size,
            max_n_segments:   a.max_n_segments,
            noise_n_segments: a.noise_n_segments,

            batch_size:                  a.batch_size,
            gradient_accumulation_steps: a.gradient_accumulation_steps,
            valid_max_samples:           Some(a.valid_max_samples),
            epochs:                      a.epochs,
            seed:                        a.seed,

            rank:           a.rank,
            world_size:     a.world_size,
            drop_last:      a.drop_last,
            data_n_workers: a.data_n_workers,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SplitArg {
    Train,
    Valid,
}

impl From<SplitArg> for Split {
    fn from(s: SplitArg) -> Self {
        match s {
            SplitArg::Train => Split::Train,
            SplitArg::Valid => Split::Valid,
        }
    }
}

/// All arguments for the `preview` command
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Which split to preview
    #[arg(long, value_enum, default_value = "train")]
    pub split: SplitArg,

    /// Number of batches to print
    #[arg(long, default_value_t = 2)]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_flag_defaults_match_run_config() {
        let cli = Cli::try_parse_from(["segment-noise-loader", "run"]).unwrap();
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.resolve().unwrap(), RunConfig::default());
    }

    #[test]
    fn test_preview_flags() {
        let cli = Cli::try_parse_from([
            "segment-noise-loader", "preview",
            "--split", "valid", "--count", "5", "--eos-id", "2", "--input-size", "128",
        ])
        .unwrap();
        let Commands::Preview(args) = cli.command else { panic!("expected preview") };

        assert_eq!(Split::from(args.split), Split::Valid);
        assert_eq!(args.count, 5);
        let cfg = args.run.resolve().unwrap();
        assert_eq!((cfg.eos_id, cfg.input_size), (Some(2), 128));
    }

    #[test]
    fn test_config_file_replaces_flags() {
        let dir  = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run_config.json");
        std::fs::write(&path, r#"{ "seed": 9, "max_n_segments": 5 }"#).unwrap();

        let cli = Cli::try_parse_from([
            "segment-noise-loader", "run",
            "--config", path.to_str().unwrap(), "--seed", "1",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        let cfg = args.resolve().unwrap();
        assert_eq!((cfg.seed, cfg.max_n_segments), (9, 5));
    }
}
