// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Mismatch Report
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::atom::Atom;

/// An evidence atom and a claim atom that cannot both hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionPair {
    pub left: Atom,
    pub right: Atom,
}

/// Evaluator output for one evidence/claim comparison.
///
/// Acceptance depends on `score >= threshold` alone. The lists exist to
/// drive repair and reason codes, never to move the accept/reject
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MismatchReport {
    /// Cosine similarity between the evidence and claim manifest vectors.
    pub score: f64,
    /// Threshold the score was judged against.
    pub threshold: f64,
    /// Claims individually ungrounded in the evidence.
    pub unsupported_claims: Vec<Atom>,
    /// Evidence atoms absent from the claims, by identity key.
    pub missing_required: Vec<Atom>,
    /// `subject:predicate:left|right`, sorted and deduplicated.
    pub ontology_conflicts: Vec<String>,
    pub contradictions: Vec<ContradictionPair>,
}

impl MismatchReport {
    pub fn accepted(&self) -> bool {
        self.score >= self.threshold
    }

    /// Stable codes for each non-empty finding list.
    pub fn reason_codes(&self) -> Vec<&'static str> {
        let mut codes = Vec::new();
        if !self.unsupported_claims.is_empty() {
            codes.push("unsupported_claims");
        }
        if !self.missing_required.is_empty() {
            codes.push("missing_required");
        }
        if !self.ontology_conflicts.is_empty() {
            codes.push("ontology_conflicts");
        }
        if !self.contradictions.is_empty() {
            codes.push("contradictions");
        }
        codes
    }
}
