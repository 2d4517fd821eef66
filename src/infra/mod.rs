// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   tokenizer_store.rs — Loads a HuggingFace tokenizer.json and
//                        resolves its pad / eos ids. Also encodes
//                        raw noise text and decodes previews.
//
//   run_dir.rs         — Saves and reloads the run configuration
//                        as JSON so a run can be reproduced.
//
//   metrics.rs         — Per-pass statistics, appended to a CSV
//                        file in the run directory.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Tokenizer loading and special token resolution
pub mod tokenizer_store;

/// Run configuration persistence
pub mod run_dir;

/// Pass statistics CSV logger
pub mod metrics;
