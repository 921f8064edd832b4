// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Mismatch Evaluator
// ─────────────────────────────────────────────────────────────────────
//! Compares an evidence manifest with a claim manifest.
//!
//! The score is the cosine between the bundled evidence (plus pack
//! axioms) and the bundled claims. Acceptance is `score >= threshold`
//! and nothing else; the finding lists (unsupported claims, missing
//! evidence, ontology conflicts, contradictions) exist to drive repair.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use arbiter_types::{ArbiterConfig, Atom, ContradictionPair, MismatchReport};

use crate::algebra::cosine_similarity;
use crate::encoder::AtomEncoder;
use crate::pack::PackModel;

pub const SCORE_THRESHOLD: f64 = 0.92;
pub const CLAIM_SUPPORT_THRESHOLD: f64 = 0.2;

/// Anything that can judge claims against evidence under a pack.
///
/// Domain packs plug their own evaluators into the verify-and-fix loop
/// through this trait.
pub trait MismatchEvaluator: Send + Sync {
    fn evaluate(&self, evidence: &[Atom], claims: &[Atom], pack: &PackModel) -> MismatchReport;
}

/// Hypervector-backed evaluator.
#[derive(Clone)]
pub struct Evaluator {
    encoder: AtomEncoder,
    score_threshold: f64,
    claim_support_threshold: f64,
}

impl Evaluator {
    pub fn new(encoder: AtomEncoder) -> Self {
        Self {
            encoder,
            score_threshold: SCORE_THRESHOLD,
            claim_support_threshold: CLAIM_SUPPORT_THRESHOLD,
        }
    }

    pub fn from_config(encoder: AtomEncoder, config: &ArbiterConfig) -> Self {
        Self::new(encoder).with_thresholds(config.score_threshold, config.claim_support_threshold)
    }

    pub fn with_thresholds(mut self, score_threshold: f64, claim_support_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self.claim_support_threshold = claim_support_threshold;
        self
    }

    pub fn encoder(&self) -> &AtomEncoder {
        &self.encoder
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    pub fn claim_support_threshold(&self) -> f64 {
        self.claim_support_threshold
    }
}

impl MismatchEvaluator for Evaluator {
    fn evaluate(&self, evidence: &[Atom], claims: &[Atom], pack: &PackModel) -> MismatchReport {
        evaluate(
            evidence,
            claims,
            pack,
            &self.encoder,
            self.score_threshold,
            self.claim_support_threshold,
        )
    }
}

/// Build a mismatch report for `claims` against `evidence ∪ pack.axioms`.
pub fn evaluate(
    evidence: &[Atom],
    claims: &[Atom],
    pack: &PackModel,
    encoder: &AtomEncoder,
    score_threshold: f64,
    claim_support_threshold: f64,
) -> MismatchReport {
    let context: Vec<&Atom> = evidence.iter().chain(pack.axioms.iter()).collect();
    let evidence_vector = encoder.encode_manifest(context.iter().copied());
    let claim_vector = encoder.encode_manifest(claims);
    let score = cosine_similarity(&evidence_vector, &claim_vector);

    let mut unsupported_claims: Vec<Atom> = claims
        .iter()
        .filter(|atom| {
            cosine_similarity(&evidence_vector, &encoder.encode_atom(atom)) < claim_support_threshold
        })
        .cloned()
        .collect();
    unsupported_claims.sort();

    let claim_keys: HashSet<_> = claims.iter().map(Atom::key).collect();
    let mut missing_required: Vec<Atom> = evidence
        .iter()
        .filter(|atom| !claim_keys.contains(&atom.key()))
        .cloned()
        .collect();
    missing_required.sort();

    let ontology_conflicts = find_conflicts(claims, &context, pack);
    let contradictions = find_contradictions(&context, claims, pack);

    log::debug!(
        "evaluate: score={score:.4} threshold={score_threshold} unsupported={} missing={} conflicts={} contradictions={}",
        unsupported_claims.len(),
        missing_required.len(),
        ontology_conflicts.len(),
        contradictions.len()
    );

    MismatchReport {
        score,
        threshold: score_threshold,
        unsupported_claims,
        missing_required,
        ontology_conflicts,
        contradictions,
    }
}

/// Exclusive object pairs asserted true under one `(subject, predicate)`.
///
/// A pair is reported when at least one side is claimed; the other side
/// may be another claim or an evidence/axiom object.
fn find_conflicts(claims: &[Atom], context: &[&Atom], pack: &PackModel) -> Vec<String> {
    let mut claimed: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();
    for atom in claims.iter().filter(|a| a.is_true) {
        claimed
            .entry((atom.subject.as_str(), atom.predicate.as_str()))
            .or_default()
            .insert(atom.object.as_str());
    }
    let mut asserted: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();
    for atom in context.iter().filter(|a| a.is_true) {
        asserted
            .entry((atom.subject.as_str(), atom.predicate.as_str()))
            .or_default()
            .insert(atom.object.as_str());
    }

    let mut conflicts = BTreeSet::new();
    for (group, claimed_objects) in &claimed {
        let mut objects = claimed_objects.clone();
        if let Some(context_objects) = asserted.get(group) {
            objects.extend(context_objects.iter().copied());
        }
        let objects: Vec<&str> = objects.into_iter().collect();
        for (i, left) in objects.iter().enumerate() {
            for right in &objects[i + 1..] {
                let touches_claim =
                    claimed_objects.contains(left) || claimed_objects.contains(right);
                if touches_claim && pack.are_exclusive(left, right) {
                    let (subject, predicate) = group;
                    conflicts.insert(format!("{subject}:{predicate}:{left}|{right}"));
                }
            }
        }
    }
    conflicts.into_iter().collect()
}

/// `(evidence, claim)` pairs that cannot both hold: same subject and
/// predicate with either exclusive objects (both true) or the same
/// object with opposite truth values.
fn find_contradictions(
    context: &[&Atom],
    claims: &[Atom],
    pack: &PackModel,
) -> Vec<ContradictionPair> {
    let mut pairs = Vec::new();
    for evidence in context {
        for claim in claims {
            if evidence.subject != claim.subject || evidence.predicate != claim.predicate {
                continue;
            }
            let clash = if evidence.object == claim.object {
                evidence.is_true != claim.is_true
            } else {
                evidence.is_true && claim.is_true && pack.are_exclusive(&evidence.object, &claim.object)
            };
            if clash {
                pairs.push(ContradictionPair {
                    left: (*evidence).clone(),
                    right: claim.clone(),
                });
            }
        }
    }
    pairs.sort_by(|a, b| (&a.left, &a.right).cmp(&(&b.left, &b.right)));
    pairs.dedup();
    pairs
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::VectorMemory;
    use crate::pack::{InMemoryPackLoader, PackLoader, PackSource};

    fn setup() -> (Evaluator, PackModel) {
        let memory = Arc::new(VectorMemory::default());
        let pack = InMemoryPackLoader::new().load("general", &memory).unwrap();
        (Evaluator::new(AtomEncoder::new(memory)), pack)
    }

    #[test]
    fn test_identical_manifests_accepted() {
        let (evaluator, pack) = setup();
        let atoms = vec![
            Atom::new("door", "state", "open"),
            Atom::new("door", "color", "red"),
        ];
        let report = evaluator.evaluate(&atoms, &atoms, &pack);
        assert!(report.score > 0.999);
        assert!(report.accepted());
        assert!(report.unsupported_claims.is_empty());
        assert!(report.missing_required.is_empty());
        assert!(report.ontology_conflicts.is_empty());
        assert!(report.contradictions.is_empty());
    }

    #[test]
    fn test_contradiction_conflict_detected() {
        let (evaluator, pack) = setup();
        let evidence = vec![Atom::new("door", "state", "open")];
        let claims = vec![Atom::new("door", "state", "closed")];
        let report = evaluator.evaluate(&evidence, &claims, &pack);
        assert!(report.score < SCORE_THRESHOLD);
        assert_eq!(report.ontology_conflicts, vec!["door:state:closed|open"]);
        assert_eq!(report.contradictions.len(), 1);
        assert_eq!(report.contradictions[0].left.object, "open");
        assert_eq!(report.contradictions[0].right.object, "closed");
        assert_eq!(report.missing_required, evidence);
    }

    #[test]
    fn test_unsupported_claims_flagged() {
        let (evaluator, pack) = setup();
        let claims = vec![Atom::new("sky", "color", "green")];
        let report = evaluator.evaluate(&[], &claims, &pack);
        assert_eq!(report.unsupported_claims, claims);
        assert!(!report.accepted());
    }

    #[test]
    fn test_antonym_claim_fully_unsupported() {
        let (evaluator, pack) = setup();
        let evidence = vec![Atom::new("bridge", "status", "safe")];
        let claims = vec![Atom::new("bridge", "status", "unsafe")];
        let report = evaluator.evaluate(&evidence, &claims, &pack);
        assert!((report.score + 1.0).abs() < 1e-6);
        assert_eq!(report.unsupported_claims.len(), 1);
    }

    #[test]
    fn test_claim_claim_mutex_conflict() {
        let (evaluator, pack) = setup();
        let claims = vec![
            Atom::new("car", "color", "red"),
            Atom::new("car", "color", "blue"),
        ];
        let report = evaluator.evaluate(&[], &claims, &pack);
        assert_eq!(report.ontology_conflicts, vec!["car:color:blue|red"]);
    }

    #[test]
    fn test_negated_claims_do_not_conflict() {
        let (evaluator, pack) = setup();
        let evidence = vec![Atom::new("door", "state", "open")];
        let claims = vec![Atom::new("door", "state", "closed").negated()];
        let report = evaluator.evaluate(&evidence, &claims, &pack);
        assert!(report.ontology_conflicts.is_empty());
        assert!(report.contradictions.is_empty());
    }

    #[test]
    fn test_truth_flip_is_contradiction() {
        let (evaluator, pack) = setup();
        let evidence = vec![Atom::new("light", "state", "on")];
        let claims = vec![Atom::new("light", "state", "on").negated()];
        let report = evaluator.evaluate(&evidence, &claims, &pack);
        assert_eq!(report.contradictions.len(), 1);
        assert_eq!(report.missing_required.len(), 1);
    }

    #[test]
    fn test_acceptance_independent_of_findings() {
        let (evaluator, pack) = setup();
        let evidence: Vec<Atom> = (0..6)
            .map(|i| Atom::new(format!("item_{i}"), "is", "present"))
            .collect();
        let mut claims = evidence.clone();
        claims.push(Atom::new("extra", "is", "present"));
        let report = evaluator
            .clone()
            .with_thresholds(0.5, 0.2)
            .evaluate(&evidence, &claims, &pack);
        assert!(report.accepted());
        assert_eq!(report.unsupported_claims.len(), 1);
        assert_eq!(report.unsupported_claims[0].subject, "extra");
    }

    #[test]
    fn test_axioms_join_evidence() {
        let memory = Arc::new(VectorMemory::default());
        let mut source = PackSource::default();
        source.axioms.push(Atom::new("water", "is", "wet"));
        let loader = InMemoryPackLoader::empty().with_pack("physics", source);
        let pack = loader.load("physics", &memory).unwrap();
        let evaluator = Evaluator::new(AtomEncoder::new(memory));

        let claims = vec![Atom::new("water", "is", "wet")];
        let report = evaluator.evaluate(&[], &claims, &pack);
        assert!(report.score > 0.999);
        // Axioms support claims but are never "missing".
        assert!(report.missing_required.is_empty());
        assert!(report.unsupported_claims.is_empty());
    }

    #[test]
    fn test_report_lists_sorted() {
        let (evaluator, pack) = setup();
        let claims = vec![
            Atom::new("zeta", "p", "o"),
            Atom::new("alpha", "p", "o"),
        ];
        let report = evaluator.evaluate(&[], &claims, &pack);
        assert_eq!(report.unsupported_claims[0].subject, "alpha");
    }
}
