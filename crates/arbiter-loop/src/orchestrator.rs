// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Verify-and-Fix Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! Drives perceiver → reasoner → evaluator rounds to a sealed result.
//!
//! States: load pack, extract evidence (optionally concurrent with a
//! draft answer), then iterate up to `max_iters`. An iteration's trace is
//! appended only after every await in it has completed, so a cancelled
//! run never leaves a partial round behind.

use std::collections::HashSet;
use std::sync::Arc;

use arbiter_core::{
    AtomEncoder, Evaluator, Feedback, FeedbackBuilder, MismatchEvaluator, PackLoader, PackModel,
    VectorMemory,
};
use arbiter_types::hashing::sha256_canonical_json;
use arbiter_types::{
    ArbiterConfig, ArbiterError, ArbiterResult, Explain, IterationTrace, Manifest,
    MismatchReport, ProofPayload, VerificationOutcome, VerificationResult, VerificationStatus,
};

use crate::agents::{Perceiver, Reasoner};

const DELTA_TOKEN_LIMIT: usize = 5;

pub struct Orchestrator {
    config: ArbiterConfig,
    memory: Arc<VectorMemory>,
    loader: Arc<dyn PackLoader>,
    perceiver: Arc<dyn Perceiver>,
    reasoner: Arc<dyn Reasoner>,
    evaluator: Arc<dyn MismatchEvaluator>,
    feedback: FeedbackBuilder,
}

impl Orchestrator {
    /// Build an orchestrator with its own vector memory and the
    /// hypervector evaluator configured from `config`.
    pub fn new(
        config: ArbiterConfig,
        loader: Arc<dyn PackLoader>,
        perceiver: Arc<dyn Perceiver>,
        reasoner: Arc<dyn Reasoner>,
    ) -> ArbiterResult<Self> {
        config.validate()?;
        let memory = Arc::new(VectorMemory::from_config(&config));
        let evaluator = Evaluator::from_config(AtomEncoder::new(Arc::clone(&memory)), &config);
        Ok(Self {
            config,
            memory,
            loader,
            perceiver,
            reasoner,
            evaluator: Arc::new(evaluator),
            feedback: FeedbackBuilder::default(),
        })
    }

    /// Replace the evaluator. It should encode through [`Self::memory`]
    /// so pack anchors apply to it.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn MismatchEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_feedback_builder(mut self, feedback: FeedbackBuilder) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn memory(&self) -> &Arc<VectorMemory> {
        &self.memory
    }

    /// Run the verify-and-fix loop for `user_text` under `pack_name`.
    ///
    /// Budget exhaustion yields `Ok(VerificationOutcome::Failed(..))`
    /// with the full history. Provider, schema and pack failures are
    /// returned as errors.
    pub async fn verify_and_fix(
        &self,
        user_text: &str,
        pack_name: &str,
    ) -> ArbiterResult<VerificationOutcome> {
        let pack = self.loader.load(pack_name, &self.memory)?;
        log::info!("verify_and_fix: pack '{}' loaded ({})", pack.name, pack.fingerprint);

        let (evidence, mut draft) = self.extract_evidence(user_text, &pack).await?;
        let evidence_hash = manifest_hash(&evidence)?;

        let mut iterations: Vec<IterationTrace> = Vec::new();
        let mut feedback: Option<Feedback> = None;
        let mut previous_answer: Option<String> = None;

        for i in 1..=self.config.max_iters {
            let answer = match draft.take() {
                Some(draft)
                    if !(self.config.regenerate_with_evidence && !evidence.is_empty()) =>
                {
                    draft
                }
                _ => {
                    self.reasoner
                        .generate_answer(
                            user_text,
                            &pack,
                            Some(&evidence),
                            feedback.as_ref().map(|f| f.text.as_str()),
                        )
                        .await?
                }
            };

            let claims = self.perceiver.extract_claim_atoms(&answer, &pack).await?;
            let mismatch = self
                .evaluator
                .evaluate(evidence.atoms(), claims.atoms(), &pack);
            let accepted = mismatch.accepted();
            let rendered = if accepted {
                Feedback::default()
            } else {
                self.feedback.build(&mismatch)
            };

            log::debug!(
                "iteration {i}: score={:.4} threshold={:.2} accepted={accepted}",
                mismatch.score,
                mismatch.threshold
            );

            iterations.push(IterationTrace {
                i,
                answer_preview: answer.chars().take(self.config.answer_preview_chars).collect(),
                score: mismatch.score,
                top_conflicts: top_conflicts(&mismatch, self.config.top_conflicts_limit),
                answer_delta_summary: answer_delta_summary(previous_answer.as_deref(), &answer),
                claim_manifest_hash: manifest_hash(&claims)?,
                feedback_text: rendered.text.clone(),
                feedback_summary: rendered.summary.clone(),
                mismatch,
            });

            if accepted {
                let result = seal(
                    VerificationStatus::Verified,
                    &pack,
                    evidence_hash,
                    Some(answer),
                    iterations,
                )?;
                log::info!(
                    "verify_and_fix: verified after {} iteration(s), proof {}",
                    result.iterations().len(),
                    result.proof_id
                );
                return Ok(VerificationOutcome::Verified(result));
            }

            feedback = Some(rendered);
            previous_answer = Some(answer);
        }

        let result = seal(VerificationStatus::Failed, &pack, evidence_hash, None, iterations)?;
        log::error!(
            "VERIFICATION FAILURE: no answer reached the threshold in {} iteration(s), proof {}",
            result.iterations().len(),
            result.proof_id
        );
        Ok(VerificationOutcome::Failed(result))
    }

    /// Evidence manifest, plus a draft answer when the parallel prepass
    /// ran and succeeded.
    async fn extract_evidence(
        &self,
        user_text: &str,
        pack: &PackModel,
    ) -> ArbiterResult<(Manifest, Option<String>)> {
        if self.config.parallel_prepass {
            let prepass = tokio::try_join!(
                self.perceiver.extract_evidence_atoms(user_text, pack),
                self.reasoner.generate_answer(user_text, pack, None, None),
            );
            match prepass {
                Ok((evidence, draft)) => return Ok((evidence, Some(draft))),
                Err(err) => {
                    log::warn!("parallel prepass failed ({err}); falling back to sequential extraction")
                }
            }
        }
        let evidence = self
            .perceiver
            .extract_evidence_atoms(user_text, pack)
            .await?;
        Ok((evidence, None))
    }
}

fn manifest_hash(manifest: &Manifest) -> ArbiterResult<String> {
    sha256_canonical_json(manifest.atoms())
}

fn seal(
    status: VerificationStatus,
    pack: &PackModel,
    evidence_manifest_hash: String,
    final_answer: Option<String>,
    iterations: Vec<IterationTrace>,
) -> ArbiterResult<VerificationResult> {
    let explain = iterations
        .last()
        .map(|trace| Explain::from_report(&trace.mismatch))
        .ok_or_else(|| ArbiterError::Config("max_iters must be >= 1".to_string()))?;
    VerificationResult::seal(ProofPayload {
        status,
        pack: pack.name.clone(),
        pack_fingerprint: pack.fingerprint.clone(),
        evidence_manifest_hash,
        final_answer,
        iterations,
        explain,
    })
}

/// Conflicts, then unsupported claims, then missing evidence, capped.
fn top_conflicts(report: &MismatchReport, limit: usize) -> Vec<String> {
    report
        .ontology_conflicts
        .iter()
        .cloned()
        .chain(report.unsupported_claims.iter().map(|a| format!("unsupported: {a}")))
        .chain(report.missing_required.iter().map(|a| format!("missing: {a}")))
        .take(limit)
        .collect()
}

fn delta_tokens(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty() && seen.insert(token.clone()))
        .collect()
}

/// Token-level summary of how `current` differs from `previous`.
///
/// `initial_answer` without a previous answer, `no_change` for identical
/// text, `reworded` when only order, case or punctuation moved, else
/// `changes: added=[..], removed=[..]` with at most five tokens each.
pub fn answer_delta_summary(previous: Option<&str>, current: &str) -> String {
    let Some(previous) = previous else {
        return "initial_answer".to_string();
    };
    if previous == current {
        return "no_change".to_string();
    }
    let before = delta_tokens(previous);
    let after = delta_tokens(current);
    let before_set: HashSet<&String> = before.iter().collect();
    let after_set: HashSet<&String> = after.iter().collect();
    let added: Vec<&str> = after
        .iter()
        .filter(|t| !before_set.contains(t))
        .take(DELTA_TOKEN_LIMIT)
        .map(String::as_str)
        .collect();
    let removed: Vec<&str> = before
        .iter()
        .filter(|t| !after_set.contains(t))
        .take(DELTA_TOKEN_LIMIT)
        .map(String::as_str)
        .collect();
    if added.is_empty() && removed.is_empty() {
        return "reworded".to_string();
    }
    format!(
        "changes: added=[{}], removed=[{}]",
        added.join(", "),
        removed.join(", ")
    )
}
