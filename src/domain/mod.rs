// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the pipeline.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain data, errors, and the traits other layers implement
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A tokenized document (ids + attention mask)
pub mod document;

// Blocks, samples and batches
pub mod sample;

// Typed pipeline errors
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
