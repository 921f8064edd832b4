// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Arbiter Kernel Verify-and-Fix Loop
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Async verify-and-fix orchestration.
//!
//! A run loads a pack, extracts an evidence manifest, then alternates
//! answer generation, claim extraction and mismatch evaluation until the
//! score clears the threshold or the iteration budget runs out. Either
//! way the caller gets a sealed, content-addressed
//! [`VerificationResult`](arbiter_types::VerificationResult).
//!
//! Perceivers, reasoners and their language-model providers are
//! capability traits; this crate ships provider-backed agents and a
//! scripted [`ReplayProvider`] but no network clients.

pub mod agents;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod retry;

pub use agents::{LlmPerceiver, LlmReasoner, Perceiver, Reasoner};
pub use orchestrator::{answer_delta_summary, Orchestrator};
pub use provider::{LlmProvider, ReplayProvider};
pub use retry::{backoff_with_jitter, run_with_retry};
