// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All pipeline logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `run`     — runs every epoch and the validation pass,
//                  logging per-pass statistics
//   2. `preview` — prints the first few collated batches
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PreviewArgs, RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "segment-noise-loader",
    version = "0.1.0",
    about = "Segment token corpora into history + noise + target samples and batch them."
)]
pub struct Cli {
    /// The subcommand to run (run or preview)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args)     => Self::run_passes(args),
            Commands::Preview(args) => Self::run_preview(args),
        }
    }

    fn run_passes(args: RunArgs) -> Result<()> {
        use crate::application::pipeline_use_case::PipelineUseCase;

        let config = args.resolve()?;
        tracing::info!("Running pipeline over: {}", config.train_corpus);

        let stats = PipelineUseCase::new(config).execute()?;
        for s in &stats {
            println!(
                "{:<5} epoch {:>2}: {:>6} batches  {:>7} samples  {:>4} dropped  padding {:>5.1}%",
                s.split,
                s.epoch,
                s.batches,
                s.samples,
                s.discarded,
                s.padding_ratio() * 100.0
            );
        }
        Ok(())
    }

    fn run_preview(args: PreviewArgs) -> Result<()> {
        use crate::application::preview_use_case::PreviewUseCase;

        let use_case = PreviewUseCase::new(args.run.resolve()?)?;
        let batches  = use_case.preview(args.split.into(), args.count)?;
        if batches.is_empty() {
            println!("No full batch could be assembled.");
        }

        for b in &batches {
            println!(
                "\nBatch {}: shape {:?}, {} supervised{}",
                b.index,
                b.shape,
                b.supervised,
                if b.has_labels_mask { ", labels_mask" } else { "" }
            );
            for (r, row) in b.rows.iter().enumerate() {
                println!(
                    "  row {r:>2}: {:>5} real  {:>5} pad  {:>4} supervised  target {}",
                    row.real,
                    row.padding,
                    row.supervised,
                    head_tail(&row.target_ids, 4)
                );
                if let Some(text) = &row.target_text {
                    println!("          {text:?}");
                }
            }
        }
        Ok(())
    }
}

/// `[a, b, c, d … w, x, y, z]` for long id lists, the full list otherwise.
fn head_tail(ids: &[i64], n: usize) -> String {
    if ids.len() <= 2 * n {
        return format!("{ids:?}");
    }
    let head: Vec<String> = ids[..n].iter().map(i64::to_string).collect();
    let tail: Vec<String> = ids[ids.len() - n..].iter().map(i64::to_string).collect();
    format!("[{} … {}]", head.join(", "), tail.join(", "))
}
