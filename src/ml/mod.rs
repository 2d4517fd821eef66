// ============================================================
// Layer 5 — ML / Tensor Layer (Burn)
// ============================================================
// The only layer that builds Burn tensors. Everything upstream
// works on plain Vec rows, so it stays testable without a
// backend.
//
//   batcher.rs — Turns collated rows into Int / Bool tensors
//                and implements Burn's Batcher trait over
//                segment samples.
//
// Reference: Burn Book §4 (Batcher)

/// Collated rows → Burn tensors
pub mod batcher;
