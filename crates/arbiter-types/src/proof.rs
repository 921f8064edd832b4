// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Iteration Traces and Verification Records
// ─────────────────────────────────────────────────────────────────────
//! Content-addressed verification records.
//!
//! The proof id is the SHA-256 of the canonical JSON of a
//! [`ProofPayload`], which is everything in the record except the id
//! itself. [`VerificationResult::seal`] is the only constructor, so an
//! id can never drift from its payload.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::error::ArbiterResult;
use crate::hashing::{canonical_json, sha256_canonical_json};
use crate::report::MismatchReport;

/// Terminal state of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Verified => f.write_str("verified"),
            VerificationStatus::Failed => f.write_str("failed"),
        }
    }
}

/// One round of the verify-and-fix loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationTrace {
    /// 1-based iteration index.
    pub i: usize,
    pub answer_preview: String,
    pub score: f64,
    pub mismatch: MismatchReport,
    /// Repair instructions handed to the next round (empty when accepted).
    pub feedback_text: String,
    pub feedback_summary: String,
    pub claim_manifest_hash: String,
    pub top_conflicts: Vec<String>,
    pub answer_delta_summary: String,
}

/// Human-oriented digest of the last mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explain {
    pub score: f64,
    pub threshold: f64,
    pub unsupported_claims: Vec<Atom>,
    pub missing_required: Vec<Atom>,
    pub ontology_conflicts: Vec<String>,
    pub summary: String,
}

impl Explain {
    pub fn from_report(report: &MismatchReport) -> Self {
        Self {
            score: (report.score * 1e6).round() / 1e6,
            threshold: report.threshold,
            unsupported_claims: report.unsupported_claims.clone(),
            missing_required: report.missing_required.clone(),
            ontology_conflicts: report.ontology_conflicts.clone(),
            summary: format!(
                "Score {:.4} vs {:.2}; unsupported={}, missing={}, conflicts={}",
                report.score,
                report.threshold,
                report.unsupported_claims.len(),
                report.missing_required.len(),
                report.ontology_conflicts.len()
            ),
        }
    }
}

/// Everything a verification record holds except its proof id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofPayload {
    pub status: VerificationStatus,
    pub pack: String,
    pub pack_fingerprint: String,
    pub evidence_manifest_hash: String,
    /// `None` when the run failed.
    pub final_answer: Option<String>,
    pub iterations: Vec<IterationTrace>,
    pub explain: Explain,
}

impl ProofPayload {
    pub fn proof_id(&self) -> ArbiterResult<String> {
        sha256_canonical_json(self)
    }
}

/// Terminal, content-addressed verification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub proof_id: String,
    #[serde(flatten)]
    pub payload: ProofPayload,
}

impl VerificationResult {
    /// Hash the payload and embed the resulting id.
    pub fn seal(payload: ProofPayload) -> ArbiterResult<Self> {
        let proof_id = payload.proof_id()?;
        Ok(Self { proof_id, payload })
    }

    pub fn status(&self) -> VerificationStatus {
        self.payload.status
    }

    pub fn iterations(&self) -> &[IterationTrace] {
        &self.payload.iterations
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.payload.final_answer.as_deref()
    }

    /// Canonical JSON of the full record, proof id included.
    pub fn canonical_json(&self) -> ArbiterResult<String> {
        canonical_json(self)
    }

    /// Recompute the id from the payload and compare.
    pub fn verify_proof_id(&self) -> ArbiterResult<bool> {
        Ok(self.payload.proof_id()? == self.proof_id)
    }
}

/// Outcome of a verify-and-fix run. Both variants carry the full record.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Verified(VerificationResult),
    Failed(VerificationResult),
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified(_))
    }

    pub fn result(&self) -> &VerificationResult {
        match self {
            VerificationOutcome::Verified(r) | VerificationOutcome::Failed(r) => r,
        }
    }

    pub fn into_result(self) -> VerificationResult {
        match self {
            VerificationOutcome::Verified(r) | VerificationOutcome::Failed(r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch() -> MismatchReport {
        MismatchReport {
            score: 0.951_234_567,
            threshold: 0.92,
            unsupported_claims: vec![],
            missing_required: vec![],
            ontology_conflicts: vec![],
            contradictions: vec![],
        }
    }

    fn payload() -> ProofPayload {
        let report = mismatch();
        ProofPayload {
            status: VerificationStatus::Verified,
            pack: "general".into(),
            pack_fingerprint: "fingerprint".into(),
            evidence_manifest_hash: "evidence".into(),
            final_answer: Some("Answer".into()),
            iterations: vec![IterationTrace {
                i: 1,
                answer_preview: "Answer".into(),
                score: report.score,
                mismatch: report.clone(),
                feedback_text: String::new(),
                feedback_summary: String::new(),
                claim_manifest_hash: "hash".into(),
                top_conflicts: vec![],
                answer_delta_summary: "initial_answer".into(),
            }],
            explain: Explain::from_report(&report),
        }
    }

    #[test]
    fn test_seal_is_deterministic() {
        let a = VerificationResult::seal(payload()).unwrap();
        let b = VerificationResult::seal(payload()).unwrap();
        assert_eq!(a.proof_id, b.proof_id);
        assert_eq!(a.canonical_json().unwrap(), b.canonical_json().unwrap());
        assert_eq!(a.proof_id.len(), 64);
    }

    #[test]
    fn test_proof_id_excludes_itself() {
        let result = VerificationResult::seal(payload()).unwrap();
        assert!(result.verify_proof_id().unwrap());
        let json = result.canonical_json().unwrap();
        assert!(json.contains(&result.proof_id));
        assert!(json.contains(r#""status":"verified""#));
    }

    #[test]
    fn test_payload_change_changes_id() {
        let a = VerificationResult::seal(payload()).unwrap();
        let mut altered = payload();
        altered.final_answer = Some("Other".into());
        let b = VerificationResult::seal(altered).unwrap();
        assert_ne!(a.proof_id, b.proof_id);
    }

    #[test]
    fn test_tampered_record_detected() {
        let mut result = VerificationResult::seal(payload()).unwrap();
        result.payload.pack = "other".into();
        assert!(!result.verify_proof_id().unwrap());
    }

    #[test]
    fn test_round_trip_through_json() {
        let result = VerificationResult::seal(payload()).unwrap();
        let json = result.canonical_json().unwrap();
        let back: VerificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.proof_id, result.proof_id);
        assert_eq!(back.status(), VerificationStatus::Verified);
        assert_eq!(back.iterations().len(), 1);
        assert_eq!(back.final_answer(), Some("Answer"));
    }

    #[test]
    fn test_explain_rounding_and_summary() {
        let explain = Explain::from_report(&mismatch());
        assert_eq!(explain.score, 0.951235);
        assert_eq!(
            explain.summary,
            "Score 0.9512 vs 0.92; unsupported=0, missing=0, conflicts=0"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let result = VerificationResult::seal(payload()).unwrap();
        let outcome = VerificationOutcome::Failed(result.clone());
        assert!(!outcome.is_verified());
        assert_eq!(outcome.result().proof_id, result.proof_id);
        assert_eq!(outcome.into_result(), result);
    }
}
