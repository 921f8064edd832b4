// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Arbiter Kernel Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Vector-symbolic encoding of factual atoms and the mismatch
//! evaluator built on it.
//!
//! Tokens map to deterministic bipolar hypervectors; atoms bind their
//! role-permuted token vectors; manifests bundle their atoms. An answer
//! is judged by the cosine between its claim manifest and the evidence
//! manifest.
//!
//! # Determinism Invariants
//!
//! 1. **Token vectors are frozen functions of (token, seed, dim)**:
//!    FNV-1a 32-bit seeds a ChaCha8 stream; no process state leaks in.
//!
//! 2. **Bundling never yields 0**: sign ties resolve to +1, so every
//!    derived vector stays bipolar.
//!
//! 3. **Manifest encoding is order-free**: bundling sums, so any
//!    permutation of the same atoms encodes identically.
//!
//! 4. **Antonyms are exact**: loading a pack overwrites each opposite
//!    with the negation of its anchor, giving cosine -1 by construction.

pub mod algebra;
pub mod encoder;
pub mod evaluator;
pub mod feedback;
pub mod memory;
pub mod pack;

pub use algebra::{bind, bundle, cosine_similarity, permute, unpermute};
pub use encoder::AtomEncoder;
pub use evaluator::{evaluate, Evaluator, MismatchEvaluator};
pub use feedback::{build_feedback, Feedback, FeedbackBuilder};
pub use memory::{Hypervector, VectorMemory};
pub use pack::{DirectoryPackLoader, InMemoryPackLoader, Ontology, PackLoader, PackModel, PackSource};
