// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from tokenized documents on disk to rectangular,
// padded batches.
//
// The pipeline flows in this order:
//
//   JSONL / text files
//       │
//       ▼
//   Loaders            → TokenizedDocument lists (read once)
//       │
//       ▼
//   TokenCorpus        → indexed, read-only corpus
//       │
//       ▼
//   Sharding           → this rank's / worker's document positions
//       │
//       ▼
//   Segmenter          → history windows ending at each block boundary
//       │
//       ▼
//   NoiseInjector      → noise blocks spliced in at random positions
//       │
//       ▼
//   BatchAssembler     → exact-size batches via a cross-document buffer
//       │
//       ▼
//   Collator           → flatten, reverse, pad, flip, labels mask
//
// Each module is responsible for exactly one step.

/// Pipeline parameters and their validation
pub mod config;

/// Loads tokenized JSONL and raw text corpora
pub mod loader;

/// In-memory corpus (also a Burn Dataset)
pub mod dataset;

/// Rank / worker partitioning of document positions
pub mod sharding;

/// Splits documents into blocks and history windows
pub mod segmenter;

/// Noise corpus grouping and noise block injection
pub mod noise;

/// Cross-document batch assembly
pub mod assembler;

/// Flatten / pad / mask collation
pub mod collator;
