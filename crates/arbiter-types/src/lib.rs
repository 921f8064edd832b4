// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Arbiter Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Data model, configuration, and error hierarchy for the Arbiter
//! Kernel, the semantic verification engine that checks generated
//! answers against the evidence they were given.

pub mod atom;
pub mod canonical;
pub mod config;
pub mod error;
pub mod hashing;
pub mod proof;
pub mod report;

pub use atom::{Atom, AtomKey, AtomKind, Manifest, SourceSpan};
pub use config::{ArbiterConfig, RetryPolicy};
pub use error::{ArbiterError, ArbiterResult, ProviderError};
pub use proof::{
    Explain, IterationTrace, ProofPayload, VerificationOutcome, VerificationResult,
    VerificationStatus,
};
pub use report::{ContradictionPair, MismatchReport};
